//! Stage sequencing: concatenate -> pair -> reduce

use tracing::info;

use super::concat::{concatenate_probed, probe_inputs};
use super::paired::reduce_paired;
use super::reduce::reduce_across_frames;
use crate::config::{ConcatConfig, FrameReduction, PairMode};
use crate::error::{MriError, Result};
use crate::nifti_io::save_volume_to_file;
use crate::source::{NiftiFiles, VolumeSource};
use crate::volume::Volume;

/// Apply the optional post-concatenation stages in order
///
/// The pair-reduced volume is handed to the frame reducer as-is.
pub fn run_stages(
    volume: Volume,
    pair_mode: PairMode,
    reduction: FrameReduction,
) -> Result<Volume> {
    let volume = if pair_mode != PairMode::None {
        info!("Combining pairs ({})", pair_mode);
        reduce_paired(volume, pair_mode)?
    } else {
        volume
    };

    match reduction {
        FrameReduction::None => Ok(volume),
        FrameReduction::Mean => {
            info!("Computing mean across frames");
            reduce_across_frames(volume, reduction)
        }
        FrameReduction::StdDev => {
            info!("Computing std across frames");
            reduce_across_frames(volume, reduction)
        }
        FrameReduction::Max => {
            info!("Computing max across all frames");
            reduce_across_frames(volume, reduction)
        }
    }
}

/// Concatenate every input of `source` and apply the configured stages
///
/// Inputs are probed first; with pairing enabled an odd total frame count
/// is rejected before the output is allocated.
pub fn run_concat<S: VolumeSource + ?Sized>(source: &S, config: &ConcatConfig) -> Result<Volume> {
    info!("ninputs = {}", source.len());
    let summary = probe_inputs(source)?;
    info!("nframestot = {}", summary.total_frames);

    if config.pair_mode != PairMode::None && summary.total_frames % 2 != 0 {
        return Err(MriError::OddFrameCount { nframes: summary.total_frames });
    }

    let volume = concatenate_probed(source, &summary)?;
    run_stages(volume, config.pair_mode, config.reduction)
}

/// Read the configured NIfTI inputs, run the stages and write the result
pub fn concat_files(config: &ConcatConfig) -> Result<()> {
    let source = NiftiFiles::new(config.inputs.clone());
    let volume = run_concat(&source, config)?;

    info!("Writing to {}", config.output.display());
    save_volume_to_file(&config.output, &volume)
}
