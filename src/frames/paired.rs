//! Pairwise combination of adjacent frames
//!
//! Frames (0,1), (2,3), ... are combined voxel by voxel into frames 0, 1, ...
//! of a volume with half as many frames.

use crate::config::PairMode;
use crate::error::{MriError, Result};
use crate::volume::Volume;

/// Combine adjacent frame pairs with the rule selected by `mode`
///
/// `PairMode::None` returns the volume unchanged. The frame count must be
/// even; this is checked before the output is allocated.
pub fn reduce_paired(volume: Volume, mode: PairMode) -> Result<Volume> {
    if mode == PairMode::None {
        return Ok(volume);
    }

    let nframes = volume.nframes();
    if nframes % 2 != 0 {
        return Err(MriError::OddFrameCount { nframes });
    }

    let mut out = volume.with_frames(nframes / 2);
    for k in 0..nframes / 2 {
        let first = volume.frame(2 * k);
        let second = volume.frame(2 * k + 1);
        for ((dst, &v1), &v2) in out.frame_mut(k).iter_mut().zip(first).zip(second) {
            *dst = mode.combine(v1, v2);
        }
    }

    Ok(out)
}
