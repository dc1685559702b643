//! NIfTI-1 file I/O for multi-frame volumes
//!
//! Reads .nii and .nii.gz (gzip is auto-detected from the magic bytes) into
//! [`Volume`], and writes volumes back as FLOAT32 single-file NIfTI-1.

use std::io::{Cursor, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use ndarray::Array;
use nifti::volume::ndarray::IntoNdArray;
use nifti::{InMemNiftiObject, NiftiHeader, NiftiObject};

use crate::error::{MriError, Result};
use crate::volume::{Volume, VolumeHeader};

/// NIfTI datatype code for 32-bit float
const DT_FLOAT32: i16 = 16;

/// Check if bytes are gzip compressed
fn is_gzip(bytes: &[u8]) -> bool {
    bytes.len() >= 2 && bytes[0] == 0x1f && bytes[1] == 0x8b
}

/// Get header info for diagnostics
fn get_header_info(bytes: &[u8]) -> String {
    if bytes.len() < 348 {
        return format!("File too small ({} bytes, need at least 348)", bytes.len());
    }

    let sizeof_hdr = i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    let magic = String::from_utf8_lossy(&bytes[344..348]).to_string();
    let datatype = i16::from_le_bytes([bytes[70], bytes[71]]);

    format!("sizeof_hdr={}, magic='{}', datatype={}", sizeof_hdr, magic, datatype)
}

/// Shape and geometry from a parsed header
fn volume_header(header: &NiftiHeader) -> Result<VolumeHeader> {
    let dim = header.dim;
    let ndim = dim[0] as usize;
    if !(3..=4).contains(&ndim) {
        return Err(MriError::Format(format!("Expected a 3D or 4D volume, got {}D", ndim)));
    }
    if dim[1] < 1 || dim[2] < 1 || dim[3] < 1 {
        return Err(MriError::Format(format!(
            "Invalid spatial dimensions {}x{}x{}",
            dim[1], dim[2], dim[3]
        )));
    }
    let nframes = if ndim == 4 && dim[4] > 0 { dim[4] as usize } else { 1 };

    let pixdim = header.pixdim;
    Ok(VolumeHeader {
        dims: (dim[1] as usize, dim[2] as usize, dim[3] as usize),
        nframes,
        voxel_size: (pixdim[1] as f64, pixdim[2] as f64, pixdim[3] as f64),
        affine: get_affine(header),
    })
}

/// Get affine transformation matrix from header
fn get_affine(header: &NiftiHeader) -> [f64; 16] {
    // Prefer sform if available (sform_code > 0)
    if header.sform_code > 0 {
        let s = &header.srow_x;
        let t = &header.srow_y;
        let u = &header.srow_z;
        [
            s[0] as f64, s[1] as f64, s[2] as f64, s[3] as f64,
            t[0] as f64, t[1] as f64, t[2] as f64, t[3] as f64,
            u[0] as f64, u[1] as f64, u[2] as f64, u[3] as f64,
            0.0, 0.0, 0.0, 1.0,
        ]
    } else {
        // Fall back to identity with voxel scaling
        let vsx = header.pixdim[1] as f64;
        let vsy = header.pixdim[2] as f64;
        let vsz = header.pixdim[3] as f64;
        [
            vsx, 0.0, 0.0, 0.0,
            0.0, vsy, 0.0, 0.0,
            0.0, 0.0, vsz, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ]
    }
}

/// Load a 3D or 4D NIfTI volume from bytes
///
/// Supports both .nii and .nii.gz content (gzip is auto-detected).
/// Scaling (scl_slope/scl_inter) is applied and all data types are
/// converted to f64.
pub fn load_nifti(bytes: &[u8]) -> Result<Volume> {
    let obj: InMemNiftiObject = if is_gzip(bytes) {
        InMemNiftiObject::from_reader(GzDecoder::new(Cursor::new(bytes)))
            .map_err(|e| MriError::Format(format!("Failed to read gzipped NIfTI: {}", e)))?
    } else {
        let info = get_header_info(bytes);
        InMemNiftiObject::from_reader(Cursor::new(bytes))
            .map_err(|e| MriError::Format(format!("Failed to read NIfTI: {} ({})", e, info)))?
    };

    let mut header = volume_header(obj.header())?;

    let volume = obj.into_volume();
    let array: Array<f64, _> = volume
        .into_ndarray()
        .map_err(|e| MriError::Format(format!("Failed to convert to ndarray: {}", e)))?;

    let shape = array.shape().to_vec();
    if shape.len() < 3 || shape.len() > 4 {
        return Err(MriError::Format(format!("Expected 3D or 4D array, got {}D", shape.len())));
    }

    // Use the actual array shape, nifti-rs may drop trailing unit dims
    let (dim0, dim1, dim2) = (shape[0], shape[1], shape[2]);
    let dim3 = if shape.len() == 4 { shape[3] } else { 1 };
    header.dims = (dim0, dim1, dim2);
    header.nframes = dim3;

    // Fortran order: index = x + y*nx + z*nx*ny + t*nx*ny*nz
    let mut data = Vec::with_capacity(dim0 * dim1 * dim2 * dim3);
    if shape.len() == 3 {
        for k in 0..dim2 {
            for j in 0..dim1 {
                for i in 0..dim0 {
                    data.push(array[[i, j, k]]);
                }
            }
        }
    } else {
        for t in 0..dim3 {
            for k in 0..dim2 {
                for j in 0..dim1 {
                    for i in 0..dim0 {
                        data.push(array[[i, j, k, t]]);
                    }
                }
            }
        }
    }

    Volume::from_data(header, data)
}

/// Read a NIfTI volume from a filesystem path
pub fn read_nifti_file(path: &Path) -> Result<Volume> {
    let bytes = std::fs::read(path).map_err(|e| MriError::io(path.display(), e))?;
    load_nifti(&bytes).map_err(|e| MriError::io(path.display(), e))
}

/// Read only the header of a NIfTI file
///
/// Used to probe dimensions and frame counts without loading voxel data.
pub fn read_nifti_header(path: &Path) -> Result<VolumeHeader> {
    let file = std::fs::File::open(path).map_err(|e| MriError::io(path.display(), e))?;
    let mut reader = std::io::BufReader::new(file);

    let mut magic = [0u8; 2];
    reader
        .read_exact(&mut magic)
        .map_err(|e| MriError::io(path.display(), e))?;
    let chained = Cursor::new(magic).chain(reader);

    let header = if is_gzip(&magic) {
        NiftiHeader::from_reader(GzDecoder::new(chained))
    } else {
        NiftiHeader::from_reader(chained)
    }
    .map_err(|e| MriError::io(path.display(), format!("Failed to read NIfTI header: {}", e)))?;

    volume_header(&header).map_err(|e| MriError::io(path.display(), e))
}

/// Encode a volume as NIfTI-1 bytes
///
/// Writes an uncompressed .nii image with FLOAT32 voxels. Volumes with more
/// than one frame are written as 4D.
pub fn save_nifti(volume: &Volume) -> Result<Vec<u8>> {
    let header_info = volume.header();
    let (nx, ny, nz) = header_info.dims;
    let nt = header_info.nframes;
    let (vsx, vsy, vsz) = header_info.voxel_size;
    let affine = &header_info.affine;

    for (axis, n) in [("x", nx), ("y", ny), ("z", nz), ("t", nt)] {
        if n > i16::MAX as usize {
            return Err(MriError::Format(format!(
                "dimension {} = {} exceeds the NIfTI-1 limit",
                axis, n
            )));
        }
    }

    // Create NIfTI-1 header (348 bytes)
    let mut header = [0u8; 348];

    // sizeof_hdr = 348
    header[0..4].copy_from_slice(&348i32.to_le_bytes());

    // dim[0..7]
    let ndim: i16 = if nt > 1 { 4 } else { 3 };
    let dim: [i16; 8] = [ndim, nx as i16, ny as i16, nz as i16, nt as i16, 1, 1, 1];
    for (i, &d) in dim.iter().enumerate() {
        let offset = 40 + i * 2;
        header[offset..offset + 2].copy_from_slice(&d.to_le_bytes());
    }

    // datatype, bitpix
    header[70..72].copy_from_slice(&DT_FLOAT32.to_le_bytes());
    header[72..74].copy_from_slice(&32i16.to_le_bytes());

    // pixdim[0..7]
    let pixdim: [f32; 8] = [1.0, vsx as f32, vsy as f32, vsz as f32, 1.0, 1.0, 1.0, 1.0];
    for (i, &p) in pixdim.iter().enumerate() {
        let offset = 76 + i * 4;
        header[offset..offset + 4].copy_from_slice(&p.to_le_bytes());
    }

    // vox_offset = 352 (header + 4 bytes extension)
    header[108..112].copy_from_slice(&352.0f32.to_le_bytes());

    // scl_slope = 1.0, scl_inter = 0.0
    header[112..116].copy_from_slice(&1.0f32.to_le_bytes());
    header[116..120].copy_from_slice(&0.0f32.to_le_bytes());

    // sform_code = 1 (scanner anat)
    header[254..256].copy_from_slice(&1i16.to_le_bytes());

    // srow_x, srow_y, srow_z
    for row in 0..3 {
        for i in 0..4 {
            let offset = 280 + row * 16 + i * 4;
            header[offset..offset + 4]
                .copy_from_slice(&(affine[row * 4 + i] as f32).to_le_bytes());
        }
    }

    // magic = "n+1\0" for NIfTI-1 single file
    header[344..348].copy_from_slice(b"n+1\0");

    let data = volume.data();
    let mut buffer = Vec::with_capacity(352 + data.len() * 4);
    buffer.extend_from_slice(&header);
    // Extension flag, all zeros = no extension
    buffer.extend_from_slice(&[0u8; 4]);
    for &val in data {
        buffer.extend_from_slice(&(val as f32).to_le_bytes());
    }

    Ok(buffer)
}

/// Encode a volume as gzipped NIfTI bytes (.nii.gz)
pub fn save_nifti_gz(volume: &Volume) -> Result<Vec<u8>> {
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    let uncompressed = save_nifti(volume)?;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(&uncompressed)
        .map_err(|e| MriError::Format(format!("Gzip compression failed: {}", e)))?;
    encoder
        .finish()
        .map_err(|e| MriError::Format(format!("Gzip finish failed: {}", e)))
}

/// Save a volume to a file
///
/// If the path ends with .nii.gz the file is gzip compressed,
/// otherwise it is saved as uncompressed .nii.
pub fn save_volume_to_file(path: &Path, volume: &Volume) -> Result<()> {
    let path_str = path.to_string_lossy();
    let bytes = if path_str.ends_with(".gz") {
        save_nifti_gz(volume)?
    } else {
        save_nifti(volume)?
    };

    std::fs::write(path, &bytes).map_err(|e| MriError::io(path.display(), e))
}
