//! Shared numeric utilities

pub mod gaussian;

pub use gaussian::{gaussian_kernel_1d, gaussian_smooth_3d, smooth_volume};
