//! Common test utilities for mri_tools integration tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use mri_tools::nifti_io::save_volume_to_file;
use mri_tools::{Volume, VolumeHeader};

/// Largest absolute difference between two arrays
pub fn max_abs_diff(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len(), "length mismatch");
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

/// A volume whose frame `f` holds `values[f]` in every voxel
pub fn constant_frames(dims: (usize, usize, usize), values: &[f64]) -> Volume {
    let header = VolumeHeader::new(dims, values.len());
    let n = header.frame_len();
    let frames: Vec<Vec<f64>> = values.iter().map(|&v| vec![v; n]).collect();
    Volume::from_frames(&header, &frames).unwrap()
}

/// A volume with a distinct value in every voxel of every frame
pub fn ramp(dims: (usize, usize, usize), nframes: usize, offset: f64) -> Volume {
    let header = VolumeHeader::new(dims, nframes);
    let n = header.frame_len() * nframes;
    let data = (0..n).map(|i| offset + i as f64 * 0.25).collect();
    Volume::from_data(header, data).unwrap()
}

/// Write each volume as `<stem><index>.nii.gz` under `dir`
pub fn write_inputs(dir: &Path, stem: &str, volumes: &[Volume]) -> Vec<PathBuf> {
    volumes
        .iter()
        .enumerate()
        .map(|(i, vol)| {
            let path = dir.join(format!("{}{}.nii.gz", stem, i));
            save_volume_to_file(&path, vol).unwrap();
            path
        })
        .collect()
}
