//! Separable 3D Gaussian smoothing
//!
//! The 1D kernel spans 10*sigma voxels (5*sigma each side) and is
//! normalised to unit sum. Borders use replicate padding.

use crate::volume::Volume;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Axis {
    X,
    Y,
    Z,
}

/// Normalised 1D Gaussian kernel of odd length
///
/// The radius is capped at `max_radius`; with replicate padding a longer
/// kernel only re-reads the border voxel.
pub fn gaussian_kernel_1d(sigma: f64, max_radius: usize) -> Vec<f64> {
    // Float-to-int `as` saturates, so huge or infinite sigma lands on the cap
    let kernel_radius = ((5.0 * sigma).ceil().max(1.0) as usize).min(max_radius.max(1));
    let kernel_size = 2 * kernel_radius + 1;

    let mut kernel: Vec<f64> = (0..kernel_size)
        .map(|i| {
            let x = i as f64 - kernel_radius as f64;
            (-x * x / (2.0 * sigma * sigma)).exp()
        })
        .collect();

    let sum: f64 = kernel.iter().sum();
    for k in kernel.iter_mut() {
        *k /= sum;
    }
    kernel
}

/// Smooth a flat 3D array
///
/// `sigma` is in voxels; a non-positive or NaN sigma returns a copy.
pub fn gaussian_smooth_3d(data: &[f64], nx: usize, ny: usize, nz: usize, sigma: f64) -> Vec<f64> {
    if !(sigma > 0.0) {
        return data.to_vec();
    }

    let kernel = gaussian_kernel_1d(sigma, nx.max(ny).max(nz));
    let smoothed_x = convolve_1d_direction(data, nx, ny, nz, &kernel, Axis::X);
    let smoothed_xy = convolve_1d_direction(&smoothed_x, nx, ny, nz, &kernel, Axis::Y);
    convolve_1d_direction(&smoothed_xy, nx, ny, nz, &kernel, Axis::Z)
}

/// Smooth every frame of a volume independently
pub fn smooth_volume(volume: &Volume, sigma: f64) -> Volume {
    let (nx, ny, nz) = volume.dims();
    let mut out = volume.with_frames(volume.nframes());
    for f in 0..volume.nframes() {
        let smoothed = gaussian_smooth_3d(volume.frame(f), nx, ny, nz, sigma);
        out.frame_mut(f).copy_from_slice(&smoothed);
    }
    out
}

/// 1D convolution along one axis with replicate padding
fn convolve_1d_direction(
    data: &[f64],
    nx: usize, ny: usize, nz: usize,
    kernel: &[f64],
    axis: Axis,
) -> Vec<f64> {
    let mut result = vec![0.0f64; nx * ny * nz];
    let kernel_radius = (kernel.len() - 1) / 2;

    let idx = |i: usize, j: usize, k: usize| i + j * nx + k * nx * ny;
    let clamp = |p: isize, n: usize| -> usize { p.max(0).min(n as isize - 1) as usize };

    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                let mut sum = 0.0;
                for (ki, &w) in kernel.iter().enumerate() {
                    let offset = ki as isize - kernel_radius as isize;
                    let src = match axis {
                        Axis::X => idx(clamp(i as isize + offset, nx), j, k),
                        Axis::Y => idx(i, clamp(j as isize + offset, ny), k),
                        Axis::Z => idx(i, j, clamp(k as isize + offset, nz)),
                    };
                    sum += data[src] * w;
                }
                result[idx(i, j, k)] = sum;
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::volume::VolumeHeader;

    #[test]
    fn test_kernel_normalised_and_symmetric() {
        let kernel = gaussian_kernel_1d(1.5, 64);
        assert_eq!(kernel.len(), 2 * 8 + 1);
        let sum: f64 = kernel.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
        for i in 0..kernel.len() / 2 {
            assert!((kernel[i] - kernel[kernel.len() - 1 - i]).abs() < 1e-15);
        }
    }

    #[test]
    fn test_kernel_radius_capped() {
        for sigma in [1e30, f64::INFINITY] {
            let kernel = gaussian_kernel_1d(sigma, 4);
            assert_eq!(kernel.len(), 9);
            let sum: f64 = kernel.iter().sum();
            assert!((sum - 1.0).abs() < 1e-12, "sigma {} sum {}", sigma, sum);
        }
    }

    #[test]
    fn test_huge_sigma_flattens_volume() {
        let data: Vec<f64> = (0..8).map(|i| i as f64).collect();
        let smoothed = gaussian_smooth_3d(&data, 2, 2, 2, 1e30);
        assert!(smoothed.iter().all(|v| v.is_finite()));
        let total: f64 = smoothed.iter().sum();
        assert!((total - 28.0).abs() < 1e-9);
    }

    #[test]
    fn test_nan_sigma_is_identity() {
        let data = vec![1.0, 2.0, 3.0, 4.0];
        assert_eq!(gaussian_smooth_3d(&data, 4, 1, 1, f64::NAN), data);
    }

    #[test]
    fn test_zero_sigma_is_identity() {
        let data: Vec<f64> = (0..27).map(|i| i as f64).collect();
        assert_eq!(gaussian_smooth_3d(&data, 3, 3, 3, 0.0), data);
    }

    #[test]
    fn test_impulse_mass_preserved_away_from_borders() {
        let n = 21;
        let mut data = vec![0.0; n * n * n];
        let c = n / 2;
        data[c + c * n + c * n * n] = 1.0;

        let smoothed = gaussian_smooth_3d(&data, n, n, n, 1.0);
        let total: f64 = smoothed.iter().sum();
        assert!((total - 1.0).abs() < 1e-9, "mass {} should be preserved", total);
        assert!(smoothed[c + c * n + c * n * n] < 1.0);
        assert!(smoothed[c + 1 + c * n + c * n * n] > 0.0);
    }

    #[test]
    fn test_constant_volume_unchanged() {
        let data = vec![3.0; 4 * 5 * 6];
        let smoothed = gaussian_smooth_3d(&data, 4, 5, 6, 2.0);
        for v in smoothed {
            assert!((v - 3.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_smooth_volume_per_frame() {
        let header = VolumeHeader::new((3, 3, 3), 2);
        let vol = Volume::from_frames(&header, &[vec![1.0; 27], vec![2.0; 27]]).unwrap();
        let out = smooth_volume(&vol, 1.0);
        assert_eq!(out.nframes(), 2);
        assert!(out.frame(1).iter().all(|&v| (v - 2.0).abs() < 1e-12));
    }
}
