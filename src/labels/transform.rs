//! Linear transforms and forward-mapped density maps
//!
//! Transforms are read from FreeSurfer LTA files (voxel-to-voxel or
//! RAS-to-RAS) or from a bare 4x4 matrix, which is taken as voxel-to-voxel.
//! Matrices are 4x4 row-major `[f64; 16]`, like volume affines.

use std::path::Path;

use crate::error::{MriError, Result};

/// Coordinate spaces a linear transform can map between
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransformSpace {
    /// LTA type 0
    VoxelToVoxel,
    /// LTA type 1, scanner (world) coordinates
    RasToRas,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LinearTransform {
    pub space: TransformSpace,
    pub matrix: [f64; 16],
}

impl LinearTransform {
    pub fn identity() -> Self {
        LinearTransform {
            space: TransformSpace::VoxelToVoxel,
            matrix: crate::volume::IDENTITY_AFFINE,
        }
    }

    /// Read a transform file from disk
    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| MriError::io(path.display(), e))?;
        Self::parse(&text)
            .map_err(|e| MriError::TransformParse(format!("{}: {}", path.display(), e)))
    }

    /// Parse LTA text, or a plain whitespace-separated 4x4 matrix
    pub fn parse(text: &str) -> Result<Self> {
        let lines: Vec<&str> = text
            .lines()
            .map(|l| l.split('#').next().unwrap_or("").trim())
            .filter(|l| !l.is_empty())
            .collect();

        let type_line = lines.iter().find(|l| l.starts_with("type"));
        match type_line {
            Some(line) => Self::parse_lta(line, &lines),
            None => {
                let values = parse_numbers(&lines.join(" "))?;
                if values.len() != 16 {
                    return Err(MriError::TransformParse(format!(
                        "expected 16 matrix values, found {}",
                        values.len()
                    )));
                }
                let mut matrix = [0.0; 16];
                matrix.copy_from_slice(&values);
                Ok(LinearTransform { space: TransformSpace::VoxelToVoxel, matrix })
            }
        }
    }

    fn parse_lta(type_line: &str, lines: &[&str]) -> Result<Self> {
        let code = type_line
            .split('=')
            .nth(1)
            .map(str::trim)
            .ok_or_else(|| MriError::TransformParse(format!("malformed line '{}'", type_line)))?;
        let space = match code {
            "0" => TransformSpace::VoxelToVoxel,
            "1" => TransformSpace::RasToRas,
            other => {
                return Err(MriError::TransformParse(format!(
                    "unsupported LTA type {}",
                    other
                )))
            }
        };

        // The matrix block follows its "<n> 4 4" size line
        let start = lines
            .iter()
            .position(|l| {
                let tokens: Vec<&str> = l.split_whitespace().collect();
                tokens.len() == 3 && tokens[1] == "4" && tokens[2] == "4"
            })
            .ok_or_else(|| MriError::TransformParse("no 4x4 matrix block".to_string()))?;

        let rows = lines
            .get(start + 1..start + 5)
            .ok_or_else(|| MriError::TransformParse("truncated matrix block".to_string()))?;
        let values = parse_numbers(&rows.join(" "))?;
        if values.len() != 16 {
            return Err(MriError::TransformParse(format!(
                "matrix block has {} values, expected 16",
                values.len()
            )));
        }

        let mut matrix = [0.0; 16];
        matrix.copy_from_slice(&values);
        Ok(LinearTransform { space, matrix })
    }

    /// Matrix mapping source voxel indices to destination voxel indices
    ///
    /// RAS-to-RAS transforms are composed with the two volume affines:
    /// inv(dst_affine) * M * src_affine.
    pub fn voxel_to_voxel(
        &self,
        src_affine: &[f64; 16],
        dst_affine: &[f64; 16],
    ) -> Result<[f64; 16]> {
        match self.space {
            TransformSpace::VoxelToVoxel => Ok(self.matrix),
            TransformSpace::RasToRas => {
                let dst_inv = invert_4x4(dst_affine).ok_or_else(|| {
                    MriError::TransformParse("destination affine is singular".to_string())
                })?;
                Ok(mat_mul(&dst_inv, &mat_mul(&self.matrix, src_affine)))
            }
        }
    }
}

fn parse_numbers(text: &str) -> Result<Vec<f64>> {
    text.split_whitespace()
        .map(|t| {
            t.parse::<f64>()
                .map_err(|_| MriError::TransformParse(format!("'{}' is not a number", t)))
        })
        .collect()
}

/// Product of two row-major 4x4 matrices
pub fn mat_mul(a: &[f64; 16], b: &[f64; 16]) -> [f64; 16] {
    let mut out = [0.0; 16];
    for r in 0..4 {
        for c in 0..4 {
            out[r * 4 + c] = (0..4).map(|k| a[r * 4 + k] * b[k * 4 + c]).sum();
        }
    }
    out
}

/// Inverse of a row-major 4x4 matrix by Gauss-Jordan elimination
pub fn invert_4x4(m: &[f64; 16]) -> Option<[f64; 16]> {
    let mut a = *m;
    let mut inv = crate::volume::IDENTITY_AFFINE;

    for col in 0..4 {
        // Partial pivoting
        let pivot = (col..4).max_by(|&x, &y| {
            a[x * 4 + col].abs().total_cmp(&a[y * 4 + col].abs())
        })?;
        if a[pivot * 4 + col].abs() < 1e-12 {
            return None;
        }
        if pivot != col {
            for c in 0..4 {
                a.swap(pivot * 4 + c, col * 4 + c);
                inv.swap(pivot * 4 + c, col * 4 + c);
            }
        }

        let p = a[col * 4 + col];
        for c in 0..4 {
            a[col * 4 + c] /= p;
            inv[col * 4 + c] /= p;
        }

        for r in 0..4 {
            if r == col {
                continue;
            }
            let factor = a[r * 4 + col];
            if factor == 0.0 {
                continue;
            }
            for c in 0..4 {
                a[r * 4 + c] -= factor * a[col * 4 + c];
                inv[r * 4 + c] -= factor * inv[col * 4 + c];
            }
        }
    }

    Some(inv)
}

/// Apply a 4x4 matrix to a point
#[inline]
pub fn apply_point(m: &[f64; 16], p: (f64, f64, f64)) -> (f64, f64, f64) {
    (
        m[0] * p.0 + m[1] * p.1 + m[2] * p.2 + m[3],
        m[4] * p.0 + m[5] * p.1 + m[6] * p.2 + m[7],
        m[8] * p.0 + m[9] * p.1 + m[10] * p.2 + m[11],
    )
}

/// Forward-map a 3D array into another grid
///
/// Every non-zero source voxel is moved through `vox2vox`, rounded to the
/// nearest destination voxel and, if it lands inside the grid, its value is
/// added there.
pub fn density_map(
    src: &[f64],
    src_dims: (usize, usize, usize),
    vox2vox: &[f64; 16],
    dst_dims: (usize, usize, usize),
) -> Vec<f64> {
    let (sx, sy, sz) = src_dims;
    let (dx, dy, dz) = dst_dims;
    let mut dst = vec![0.0; dx * dy * dz];

    for k in 0..sz {
        for j in 0..sy {
            for i in 0..sx {
                let v = src[i + j * sx + k * sx * sy];
                if v == 0.0 {
                    continue;
                }
                let (x, y, z) = apply_point(vox2vox, (i as f64, j as f64, k as f64));
                let (x, y, z) = (x.round(), y.round(), z.round());
                if x < 0.0 || y < 0.0 || z < 0.0 {
                    continue;
                }
                let (x, y, z) = (x as usize, y as usize, z as usize);
                if x >= dx || y >= dy || z >= dz {
                    continue;
                }
                dst[x + y * dx + z * dx * dy] += v;
            }
        }
    }

    dst
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::volume::IDENTITY_AFFINE;

    const LTA_VOX: &str = "\
# transform file
type      = 0 # LINEAR_VOX_TO_VOX
nxforms   = 1
mean      = 0.0000 0.0000 0.0000
sigma     = 1.0000
1 4 4
1.0 0.0 0.0 1.0
0.0 1.0 0.0 0.0
0.0 0.0 1.0 0.0
0.0 0.0 0.0 1.0
src volume info
valid = 1
";

    #[test]
    fn test_parse_lta_vox2vox() {
        let xform = LinearTransform::parse(LTA_VOX).unwrap();
        assert_eq!(xform.space, TransformSpace::VoxelToVoxel);
        assert_eq!(xform.matrix[3], 1.0);
        assert_eq!(xform.matrix[15], 1.0);
    }

    #[test]
    fn test_parse_lta_ras2ras() {
        let text = LTA_VOX.replace("type      = 0", "type      = 1");
        let xform = LinearTransform::parse(&text).unwrap();
        assert_eq!(xform.space, TransformSpace::RasToRas);
    }

    #[test]
    fn test_parse_plain_matrix() {
        let xform = LinearTransform::parse("2 0 0 0\n0 2 0 0\n0 0 2 0\n0 0 0 1\n").unwrap();
        assert_eq!(xform.matrix[0], 2.0);
        assert_eq!(xform.space, TransformSpace::VoxelToVoxel);
    }

    #[test]
    fn test_parse_errors() {
        assert!(LinearTransform::parse("1 2 3").is_err());
        assert!(LinearTransform::parse("type = 2\n1 4 4\n").is_err());
        assert!(LinearTransform::parse("type = 0\n1 4 4\n1 0 0 0\n").is_err());
        assert!(LinearTransform::parse("1 0 0 0 0 1 0 0 0 0 1 0 0 0 0 x").is_err());
    }

    #[test]
    fn test_invert_roundtrip() {
        let m = [
            2.0, 0.1, 0.0, 5.0,
            0.0, 1.5, 0.3, -2.0,
            0.2, 0.0, 3.0, 1.0,
            0.0, 0.0, 0.0, 1.0,
        ];
        let inv = invert_4x4(&m).unwrap();
        let id = mat_mul(&m, &inv);
        for i in 0..16 {
            assert!((id[i] - IDENTITY_AFFINE[i]).abs() < 1e-10, "entry {} = {}", i, id[i]);
        }
    }

    #[test]
    fn test_singular_matrix() {
        assert!(invert_4x4(&[0.0; 16]).is_none());
    }

    #[test]
    fn test_ras_to_voxel_composition() {
        // Both volumes 2mm isotropic, RAS shift of +2mm in x => one voxel
        let affine = [
            2.0, 0.0, 0.0, 0.0,
            0.0, 2.0, 0.0, 0.0,
            0.0, 0.0, 2.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ];
        let mut shift = IDENTITY_AFFINE;
        shift[3] = 2.0;
        let xform = LinearTransform { space: TransformSpace::RasToRas, matrix: shift };
        let v2v = xform.voxel_to_voxel(&affine, &affine).unwrap();
        let p = apply_point(&v2v, (1.0, 1.0, 1.0));
        assert!((p.0 - 2.0).abs() < 1e-12);
        assert!((p.1 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_density_map_identity_and_shift() {
        let mut src = vec![0.0; 8];
        src[0] = 128.0;
        src[7] = 128.0;
        let same = density_map(&src, (2, 2, 2), &IDENTITY_AFFINE, (2, 2, 2));
        assert_eq!(same, src);

        let mut shift = IDENTITY_AFFINE;
        shift[3] = 1.0;
        let moved = density_map(&src, (2, 2, 2), &shift, (3, 2, 2));
        assert_eq!(moved[1], 128.0);
        // (1,1,1) -> (2,1,1)
        assert_eq!(moved[2 + 3 + 6], 128.0);
        assert_eq!(moved.iter().sum::<f64>(), 256.0);
    }

    #[test]
    fn test_density_map_drops_out_of_bounds() {
        let src = vec![1.0; 8];
        let mut shift = IDENTITY_AFFINE;
        shift[3] = -1.0;
        let moved = density_map(&src, (2, 2, 2), &shift, (2, 2, 2));
        assert_eq!(moved.iter().sum::<f64>(), 4.0);
    }
}
