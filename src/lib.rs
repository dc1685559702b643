//! mri_tools: frame concatenation and label extraction for NIfTI volumes
//!
//! # Modules
//! - `volume`: multi-frame scalar volumes and their geometry
//! - `nifti_io`: NIfTI-1 reading (full and header-only) and writing
//! - `source`: ordered inputs loaded one at a time
//! - `config`: validated concatenation options (pairing and frame reduction modes)
//! - `frames`: concatenation, pairwise combination and reductions across frames
//! - `labels`: label extraction, transforms and label names
//! - `utils`: Gaussian smoothing
//! - `logging`: tracing setup for the binaries

// Core modules
pub mod error;
pub mod volume;

// I/O modules
pub mod nifti_io;
pub mod source;

// Algorithm modules
pub mod config;
pub mod frames;
pub mod labels;
pub mod utils;

pub mod logging;

pub use error::{MriError, Result};
pub use volume::{Volume, VolumeHeader};
