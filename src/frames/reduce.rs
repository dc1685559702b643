//! Reductions across the frame axis

use crate::config::FrameReduction;
use crate::error::{MriError, Result};
use crate::volume::Volume;

/// Collapse all frames into a single summary frame
///
/// `FrameReduction::None` returns the volume unchanged. `StdDev` is the
/// sample standard deviation and needs at least two frames.
pub fn reduce_across_frames(volume: Volume, mode: FrameReduction) -> Result<Volume> {
    if volume.nframes() == 0 && mode != FrameReduction::None {
        return Err(MriError::Format("cannot reduce a volume with no frames".to_string()));
    }
    match mode {
        FrameReduction::None => Ok(volume),
        FrameReduction::Mean => Ok(frame_mean(&volume)),
        FrameReduction::StdDev => frame_std(&volume),
        FrameReduction::Max => Ok(frame_max(&volume)),
    }
}

fn frame_mean(volume: &Volume) -> Volume {
    let nframes = volume.nframes();
    let mut out = volume.with_frames(1);
    let acc = out.frame_mut(0);
    for f in 0..nframes {
        for (a, &v) in acc.iter_mut().zip(volume.frame(f)) {
            *a += v;
        }
    }
    let n = nframes as f64;
    for a in acc.iter_mut() {
        *a /= n;
    }
    out
}

fn frame_std(volume: &Volume) -> Result<Volume> {
    let nframes = volume.nframes();
    if nframes < 2 {
        return Err(MriError::InsufficientFrames { nframes });
    }

    let mean = frame_mean(volume);
    let mean = mean.frame(0);

    let mut out = volume.with_frames(1);
    let acc = out.frame_mut(0);
    for f in 0..nframes {
        for ((a, &v), &m) in acc.iter_mut().zip(volume.frame(f)).zip(mean) {
            let d = v - m;
            *a += d * d;
        }
    }
    let dof = (nframes - 1) as f64;
    for a in acc.iter_mut() {
        *a = (*a / dof).sqrt();
    }
    Ok(out)
}

fn frame_max(volume: &Volume) -> Volume {
    let mut out = volume.with_frames(1);
    let acc = out.frame_mut(0);
    acc.copy_from_slice(volume.frame(0));
    for f in 1..volume.nframes() {
        for (a, &v) in acc.iter_mut().zip(volume.frame(f)) {
            if v > *a {
                *a = v;
            }
        }
    }
    out
}
