//! Ordered volume inputs
//!
//! A [`VolumeSource`] hands out headers cheaply and full volumes one at a
//! time, so callers can validate every input before loading any voxel data.

use std::path::PathBuf;

use crate::error::{MriError, Result};
use crate::nifti_io::{read_nifti_file, read_nifti_header};
use crate::volume::{Volume, VolumeHeader};

pub trait VolumeSource {
    /// Number of inputs
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Human-readable identifier used in diagnostics
    fn name(&self, index: usize) -> String;

    /// Shape and geometry only
    fn read_header(&self, index: usize) -> Result<VolumeHeader>;

    /// Full voxel data
    fn read_volume(&self, index: usize) -> Result<Volume>;
}

/// NIfTI files on disk, read in the order given
#[derive(Clone, Debug)]
pub struct NiftiFiles {
    paths: Vec<PathBuf>,
}

impl NiftiFiles {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        NiftiFiles { paths }
    }

    fn path(&self, index: usize) -> Result<&PathBuf> {
        self.paths
            .get(index)
            .ok_or_else(|| MriError::io(format!("input #{}", index), "no such input"))
    }
}

impl VolumeSource for NiftiFiles {
    fn len(&self) -> usize {
        self.paths.len()
    }

    fn name(&self, index: usize) -> String {
        match self.paths.get(index) {
            Some(p) => p.display().to_string(),
            None => format!("input #{}", index),
        }
    }

    fn read_header(&self, index: usize) -> Result<VolumeHeader> {
        read_nifti_header(self.path(index)?)
    }

    fn read_volume(&self, index: usize) -> Result<Volume> {
        read_nifti_file(self.path(index)?)
    }
}

/// Volumes already in memory; `read_volume` hands out copies
impl VolumeSource for [Volume] {
    fn len(&self) -> usize {
        <[Volume]>::len(self)
    }

    fn name(&self, index: usize) -> String {
        format!("input #{}", index)
    }

    fn read_header(&self, index: usize) -> Result<VolumeHeader> {
        self.get(index)
            .map(|v| v.header().clone())
            .ok_or_else(|| MriError::io(self.name(index), "no such input"))
    }

    fn read_volume(&self, index: usize) -> Result<Volume> {
        self.get(index)
            .cloned()
            .ok_or_else(|| MriError::io(self.name(index), "no such input"))
    }
}
