//! Extraction of labelled voxels from a segmentation volume

use std::path::PathBuf;

use tracing::{debug, info};

use super::lookup::label_name;
use super::transform::{density_map, LinearTransform};
use crate::error::{MriError, Result};
use crate::nifti_io::{read_nifti_file, read_nifti_header, save_volume_to_file};
use crate::utils::gaussian::smooth_volume;
use crate::volume::{Volume, VolumeHeader};

/// Value written into voxels that carry an extracted label
pub const UNIT_VOLUME: f64 = 128.0;

/// Immutable configuration for one extraction run
#[derive(Clone, Debug, PartialEq)]
pub struct ExtractConfig {
    pub input: PathBuf,
    pub labels: Vec<i32>,
    pub output: PathBuf,
    /// Gaussian sigma in voxels; 0 disables smoothing
    pub sigma: f64,
    pub transform: Option<PathBuf>,
    /// Template volume whose grid the output takes
    pub out_like: Option<PathBuf>,
    pub debug_voxel: Option<(usize, usize, usize)>,
    /// Flat frame-0 index of a voxel to log after each step
    pub diag_index: Option<usize>,
}

/// Parse a label given on the command line
pub fn parse_label(text: &str) -> Result<i32> {
    text.trim()
        .parse::<i32>()
        .map_err(|_| MriError::InvalidLabel(text.to_string()))
}

/// Binarise one label of a 3D array
///
/// Voxels equal to `label` keep their value, all others become 0; the
/// result is then thresholded at 1 to [`UNIT_VOLUME`]. Labels below 1
/// therefore select nothing.
pub fn binarize_label(frame: &[f64], label: i32) -> Vec<f64> {
    let target = label as f64;
    frame
        .iter()
        .map(|&v| {
            let copied = if v == target { v } else { 0.0 };
            if copied >= 1.0 { UNIT_VOLUME } else { 0.0 }
        })
        .collect()
}

/// Check a smoothing sigma: finite and non-negative
pub fn validate_sigma(sigma: f64) -> Result<f64> {
    if sigma.is_finite() && sigma >= 0.0 {
        Ok(sigma)
    } else {
        Err(MriError::InvalidParameter(format!(
            "sigma must be a finite, non-negative number of voxels (got {})",
            sigma
        )))
    }
}

/// Options that shape an extraction, independent of where volumes come from
#[derive(Clone, Debug, Default)]
pub struct ExtractOptions<'a> {
    /// Output grid; defaults to the input's
    pub template: Option<&'a VolumeHeader>,
    pub transform: Option<&'a LinearTransform>,
    pub sigma: f64,
    pub debug_voxel: Option<(usize, usize, usize)>,
    pub diag_index: Option<usize>,
}

/// Accumulate the binarised masks of `labels` into a single-frame volume
///
/// Only the first frame of `input` is read.
pub fn extract_labels(input: &Volume, labels: &[i32], options: &ExtractOptions) -> Result<Volume> {
    let sigma = validate_sigma(options.sigma)?;
    let out_header = options.template.unwrap_or(input.header());
    let mut out = Volume::zeros(out_header, 1);

    let vox2vox = match options.transform {
        Some(xform) => Some(xform.voxel_to_voxel(&input.header().affine, &out_header.affine)?),
        None => None,
    };
    if vox2vox.is_none() && input.dims() != out_header.dims {
        return Err(MriError::DimensionMismatch {
            first: "input volume".to_string(),
            offending: "output template".to_string(),
        });
    }

    for &label in labels {
        info!("extracting label {} ({})", label, label_name(label));
        let binarized = binarize_label(input.frame(0), label);
        let mapped = match &vox2vox {
            Some(m) => density_map(&binarized, input.dims(), m, out_header.dims),
            None => binarized,
        };
        for (dst, v) in out.frame_mut(0).iter_mut().zip(mapped) {
            *dst += v;
        }
        log_debug_voxel(&out, options, "after label");
    }

    if sigma > 0.0 {
        info!("smoothing extracted volume (sigma={:.1})...", sigma);
        out = smooth_volume(&out, sigma);
        log_debug_voxel(&out, options, "after smoothing");
    }

    Ok(out)
}

fn log_debug_voxel(volume: &Volume, options: &ExtractOptions, stage: &str) {
    if let Some((x, y, z)) = options.debug_voxel {
        let (nx, ny, nz) = volume.dims();
        if x < nx && y < ny && z < nz {
            debug!("voxel ({}, {}, {}) {} = {}", x, y, z, stage, volume.get_voxel(x, y, z, 0));
        }
    }
    if let Some(index) = options.diag_index {
        if let Some(v) = volume.frame(0).get(index) {
            debug!("diagnostic voxel #{} {} = {}", index, stage, v);
        }
    }
}

/// Read the input, extract the configured labels and write the result
pub fn extract_label_files(config: &ExtractConfig) -> Result<()> {
    info!("reading volume from {}...", config.input.display());
    let input = read_nifti_file(&config.input)?;

    let template = match &config.out_like {
        Some(path) => {
            info!("shaping output to be like {}...", path.display());
            Some(read_nifti_header(path)?)
        }
        None => None,
    };
    let transform = match &config.transform {
        Some(path) => {
            info!("reading and applying transform {}...", path.display());
            Some(LinearTransform::read(path)?)
        }
        None => None,
    };

    let options = ExtractOptions {
        template: template.as_ref(),
        transform: transform.as_ref(),
        sigma: config.sigma,
        debug_voxel: config.debug_voxel,
        diag_index: config.diag_index,
    };
    let out = extract_labels(&input, &config.labels, &options)?;
    drop(input);

    info!("writing output to {}.", config.output.display());
    save_volume_to_file(&config.output, &out)
}
