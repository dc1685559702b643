//! Multi-frame scalar volumes
//!
//! Voxels are stored flat in NIfTI (Fortran) order, x varies fastest:
//! index = col + row*nx + slice*nx*ny + frame*nx*ny*nz

use crate::error::{MriError, Result};

/// Identity affine with unit voxel scaling
pub const IDENTITY_AFFINE: [f64; 16] = [
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 1.0, 0.0,
    0.0, 0.0, 0.0, 1.0,
];

/// Geometry and shape of a volume, without voxel data
#[derive(Clone, Debug, PartialEq)]
pub struct VolumeHeader {
    /// Spatial dimensions (width, height, depth)
    pub dims: (usize, usize, usize),
    /// Number of frames (>= 1)
    pub nframes: usize,
    /// Voxel sizes in mm
    pub voxel_size: (f64, f64, f64),
    /// Voxel-to-world affine (4x4, row-major)
    pub affine: [f64; 16],
}

impl VolumeHeader {
    pub fn new(dims: (usize, usize, usize), nframes: usize) -> Self {
        VolumeHeader {
            dims,
            nframes,
            voxel_size: (1.0, 1.0, 1.0),
            affine: IDENTITY_AFFINE,
        }
    }

    /// Number of voxels in one frame
    #[inline]
    pub fn frame_len(&self) -> usize {
        self.dims.0 * self.dims.1 * self.dims.2
    }

    pub fn same_space(&self, other: &VolumeHeader) -> bool {
        self.dims == other.dims
    }
}

/// A 3D+frame scalar image held in memory as f64
#[derive(Clone, Debug, PartialEq)]
pub struct Volume {
    header: VolumeHeader,
    data: Vec<f64>,
}

impl Volume {
    /// Allocate a zero-filled volume with the geometry of `header` and `nframes` frames
    pub fn zeros(header: &VolumeHeader, nframes: usize) -> Self {
        let mut header = header.clone();
        header.nframes = nframes;
        let data = vec![0.0; header.frame_len() * nframes];
        Volume { header, data }
    }

    /// Wrap existing voxel data. The data length must match dims * nframes.
    pub fn from_data(header: VolumeHeader, data: Vec<f64>) -> Result<Self> {
        if header.nframes == 0 {
            return Err(MriError::Format("volume has no frames".to_string()));
        }
        let expected = header.frame_len() * header.nframes;
        if data.len() != expected {
            return Err(MriError::Format(format!(
                "expected {} voxels for {}x{}x{}x{}, got {}",
                expected, header.dims.0, header.dims.1, header.dims.2, header.nframes, data.len()
            )));
        }
        Ok(Volume { header, data })
    }

    /// Build a volume from one flat 3D array per frame
    pub fn from_frames(header: &VolumeHeader, frames: &[Vec<f64>]) -> Result<Self> {
        if frames.is_empty() {
            return Err(MriError::Format("volume has no frames".to_string()));
        }
        let mut volume = Volume::zeros(header, frames.len());
        for (f, frame) in frames.iter().enumerate() {
            if frame.len() != header.frame_len() {
                return Err(MriError::Format(format!(
                    "frame {} has {} voxels, expected {}",
                    f, frame.len(), header.frame_len()
                )));
            }
            volume.frame_mut(f).copy_from_slice(frame);
        }
        Ok(volume)
    }

    /// A zero-filled volume in the same space with a different frame count
    pub fn with_frames(&self, nframes: usize) -> Self {
        Volume::zeros(&self.header, nframes)
    }

    pub fn header(&self) -> &VolumeHeader {
        &self.header
    }

    pub fn dims(&self) -> (usize, usize, usize) {
        self.header.dims
    }

    pub fn nframes(&self) -> usize {
        self.header.nframes
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    #[inline(always)]
    fn index(&self, col: usize, row: usize, slice: usize, frame: usize) -> usize {
        let (nx, ny, _) = self.header.dims;
        col + row * nx + slice * nx * ny + frame * self.header.frame_len()
    }

    #[inline]
    pub fn get_voxel(&self, col: usize, row: usize, slice: usize, frame: usize) -> f64 {
        self.data[self.index(col, row, slice, frame)]
    }

    #[inline]
    pub fn set_voxel(&mut self, col: usize, row: usize, slice: usize, frame: usize, value: f64) {
        let i = self.index(col, row, slice, frame);
        self.data[i] = value;
    }

    /// Voxels of a single frame
    pub fn frame(&self, frame: usize) -> &[f64] {
        let n = self.header.frame_len();
        &self.data[frame * n..(frame + 1) * n]
    }

    pub fn frame_mut(&mut self, frame: usize) -> &mut [f64] {
        let n = self.header.frame_len();
        &mut self.data[frame * n..(frame + 1) * n]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros_copies_geometry() {
        let mut header = VolumeHeader::new((2, 3, 4), 1);
        header.voxel_size = (1.5, 1.5, 2.0);
        let vol = Volume::zeros(&header, 5);
        assert_eq!(vol.nframes(), 5);
        assert_eq!(vol.data().len(), 2 * 3 * 4 * 5);
        assert_eq!(vol.header().voxel_size, (1.5, 1.5, 2.0));
    }

    #[test]
    fn test_voxel_indexing_fortran_order() {
        let header = VolumeHeader::new((2, 2, 2), 2);
        let mut vol = Volume::zeros(&header, 2);
        vol.set_voxel(1, 0, 0, 0, 7.0);
        vol.set_voxel(0, 1, 1, 1, 9.0);
        assert_eq!(vol.data()[1], 7.0);
        assert_eq!(vol.data()[2 + 4 + 8], 9.0);
        assert_eq!(vol.get_voxel(0, 1, 1, 1), 9.0);
        assert_eq!(vol.frame(1)[6], 9.0);
    }

    #[test]
    fn test_from_data_rejects_wrong_length() {
        let header = VolumeHeader::new((2, 2, 2), 1);
        assert!(Volume::from_data(header, vec![0.0; 7]).is_err());
    }

    #[test]
    fn test_zero_frames_rejected() {
        let header = VolumeHeader::new((2, 2, 2), 0);
        assert!(matches!(
            Volume::from_data(header.clone(), Vec::new()),
            Err(MriError::Format(_))
        ));
        assert!(matches!(Volume::from_frames(&header, &[]), Err(MriError::Format(_))));
    }

    #[test]
    fn test_from_frames() {
        let header = VolumeHeader::new((2, 1, 1), 1);
        let vol = Volume::from_frames(&header, &[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(vol.nframes(), 2);
        assert_eq!(vol.frame(1), &[3.0, 4.0]);
    }
}
