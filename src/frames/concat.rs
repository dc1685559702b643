//! Concatenation of input frames into one 4D volume

use tracing::debug;

use crate::error::{MriError, Result};
use crate::source::VolumeSource;
use crate::volume::{Volume, VolumeHeader};

/// Result of probing every input header
#[derive(Clone, Debug, PartialEq)]
pub struct InputSummary {
    /// Header of the first input; its geometry is used for the output
    pub header: VolumeHeader,
    /// Sum of the frame counts of all inputs
    pub total_frames: usize,
}

/// Check that all inputs share the first input's spatial dimensions
///
/// Reads headers only. Fails on the first input whose dimensions differ.
pub fn probe_inputs<S: VolumeSource + ?Sized>(source: &S) -> Result<InputSummary> {
    if source.is_empty() {
        return Err(MriError::MissingInput);
    }

    let first = source.read_header(0)?;
    let mut total_frames = first.nframes;
    debug!(
        "{:2} {} ({}x{}x{}, {} frames)",
        0,
        source.name(0),
        first.dims.0,
        first.dims.1,
        first.dims.2,
        first.nframes
    );

    for index in 1..source.len() {
        let header = source.read_header(index)?;
        debug!("{:2} {} ({} frames)", index, source.name(index), header.nframes);
        if !header.same_space(&first) {
            return Err(MriError::DimensionMismatch {
                first: source.name(0),
                offending: source.name(index),
            });
        }
        total_frames += header.nframes;
    }

    Ok(InputSummary { header: first, total_frames })
}

/// Stack every frame of every input, in input order
///
/// Output frame `offset_j + i` is frame `i` of input `j`, where `offset_j`
/// is the number of frames in the inputs before `j`. Geometry is taken from
/// the first input. Inputs are loaded one at a time and dropped once copied.
pub fn concatenate<S: VolumeSource + ?Sized>(source: &S) -> Result<Volume> {
    let summary = probe_inputs(source)?;
    concatenate_probed(source, &summary)
}

/// Concatenate after [`probe_inputs`] has already validated the inputs
pub(crate) fn concatenate_probed<S: VolumeSource + ?Sized>(
    source: &S,
    summary: &InputSummary,
) -> Result<Volume> {
    let mut out = Volume::zeros(&summary.header, summary.total_frames);

    let mut fout = 0;
    for index in 0..source.len() {
        debug!("loading input {} ({})", index, source.name(index));
        let input = source.read_volume(index)?;

        // The file may not agree with the header we probed
        if input.dims() != summary.header.dims {
            return Err(MriError::DimensionMismatch {
                first: source.name(0),
                offending: source.name(index),
            });
        }
        if fout + input.nframes() > summary.total_frames {
            return Err(MriError::Format(format!(
                "{} has more frames than its header reported",
                source.name(index)
            )));
        }

        for f in 0..input.nframes() {
            out.frame_mut(fout).copy_from_slice(input.frame(f));
            fout += 1;
        }
        drop(input);
    }

    if fout != summary.total_frames {
        return Err(MriError::Format(format!(
            "expected {} frames in total, read {}",
            summary.total_frames, fout
        )));
    }

    Ok(out)
}
