//! Validated run configuration for frame concatenation
//!
//! Command-line switches are collected into [`ConcatFlags`] and validated
//! once into an immutable [`ConcatConfig`] before any volume is touched.

use std::fmt;
use std::path::PathBuf;

use crate::error::{MriError, Result};

/// How adjacent frame pairs (2k, 2k+1) are combined
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PairMode {
    #[default]
    None,
    /// (v1 + v2) / 2
    PairAvg,
    /// v1 - v2
    PairDiff,
    /// (v1 - v2) / ((v1 + v2) / 2)
    PairDiffNormAvg,
    /// (v1 - v2) / v1
    PairDiffNorm1,
    /// (v1 - v2) / v2
    PairDiffNorm2,
}

impl PairMode {
    /// Combine one voxel pair. Zero denominators yield 0 (exact comparison).
    #[inline]
    pub fn combine(self, v1: f64, v2: f64) -> f64 {
        match self {
            PairMode::None => v1,
            PairMode::PairAvg => (v1 + v2) / 2.0,
            PairMode::PairDiff => v1 - v2,
            PairMode::PairDiffNormAvg => {
                if v1 + v2 == 0.0 {
                    0.0
                } else {
                    (v1 - v2) / ((v1 + v2) / 2.0)
                }
            }
            PairMode::PairDiffNorm1 => {
                if v1 == 0.0 {
                    0.0
                } else {
                    (v1 - v2) / v1
                }
            }
            PairMode::PairDiffNorm2 => {
                if v2 == 0.0 {
                    0.0
                } else {
                    (v1 - v2) / v2
                }
            }
        }
    }
}

impl fmt::Display for PairMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PairMode::None => "none",
            PairMode::PairAvg => "paired-avg",
            PairMode::PairDiff => "paired-diff",
            PairMode::PairDiffNormAvg => "paired-diff-norm",
            PairMode::PairDiffNorm1 => "paired-diff-norm1",
            PairMode::PairDiffNorm2 => "paired-diff-norm2",
        };
        f.write_str(name)
    }
}

/// Summary computed across all frames
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FrameReduction {
    #[default]
    None,
    Mean,
    /// Sample standard deviation (n - 1)
    StdDev,
    Max,
}

impl fmt::Display for FrameReduction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FrameReduction::None => "none",
            FrameReduction::Mean => "mean",
            FrameReduction::StdDev => "std",
            FrameReduction::Max => "max",
        };
        f.write_str(name)
    }
}

/// Raw switches as given on the command line
#[derive(Clone, Debug, Default)]
pub struct ConcatFlags {
    pub inputs: Vec<PathBuf>,
    pub output: Option<PathBuf>,
    pub mean: bool,
    pub std: bool,
    pub max: bool,
    /// Paired difference followed by the mean of the differences
    pub asl: bool,
    pub paired_avg: bool,
    pub paired_diff: bool,
    pub paired_diff_norm: bool,
    pub paired_diff_norm1: bool,
    pub paired_diff_norm2: bool,
}

/// Immutable configuration for one concatenation run
#[derive(Clone, Debug, PartialEq)]
pub struct ConcatConfig {
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
    pub pair_mode: PairMode,
    pub reduction: FrameReduction,
}

impl ConcatFlags {
    /// Check option groups and build the run configuration.
    ///
    /// Pure: no file is opened here.
    pub fn validate(self) -> Result<ConcatConfig> {
        if self.inputs.is_empty() {
            return Err(MriError::MissingInput);
        }
        let output = self.output.ok_or(MriError::MissingOutput)?;

        let any_norm = self.paired_diff_norm || self.paired_diff_norm1 || self.paired_diff_norm2;
        let any_diff = self.paired_diff || self.asl || any_norm;
        if any_diff && self.paired_avg {
            return Err(MriError::ConflictingOptions(
                "cannot specify both --paired-diff-xxx and --paired-avg".to_string(),
            ));
        }

        let norms = [
            (self.paired_diff_norm, "--paired-diff-norm"),
            (self.paired_diff_norm1, "--paired-diff-norm1"),
            (self.paired_diff_norm2, "--paired-diff-norm2"),
        ];
        let selected: Vec<&str> = norms.iter().filter(|(on, _)| *on).map(|(_, n)| *n).collect();
        if selected.len() > 1 {
            return Err(MriError::ConflictingOptions(format!(
                "cannot specify both {}",
                selected.join(" and ")
            )));
        }

        let mean = self.mean || self.asl;
        if mean && self.std {
            return Err(MriError::ConflictingOptions("cannot --mean and --std".to_string()));
        }
        if self.max && (mean || self.std) {
            return Err(MriError::ConflictingOptions(
                "--max cannot be combined with --mean or --std".to_string(),
            ));
        }

        // A normalised variant takes precedence over the plain difference it implies
        let pair_mode = if self.paired_diff_norm {
            PairMode::PairDiffNormAvg
        } else if self.paired_diff_norm1 {
            PairMode::PairDiffNorm1
        } else if self.paired_diff_norm2 {
            PairMode::PairDiffNorm2
        } else if any_diff {
            PairMode::PairDiff
        } else if self.paired_avg {
            PairMode::PairAvg
        } else {
            PairMode::None
        };

        let reduction = if mean {
            FrameReduction::Mean
        } else if self.std {
            FrameReduction::StdDev
        } else if self.max {
            FrameReduction::Max
        } else {
            FrameReduction::None
        };

        Ok(ConcatConfig {
            inputs: self.inputs,
            output,
            pair_mode,
            reduction,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags() -> ConcatFlags {
        ConcatFlags {
            inputs: vec![PathBuf::from("a.nii"), PathBuf::from("b.nii")],
            output: Some(PathBuf::from("out.nii")),
            ..Default::default()
        }
    }

    #[test]
    fn test_plain_concat() {
        let cfg = flags().validate().unwrap();
        assert_eq!(cfg.pair_mode, PairMode::None);
        assert_eq!(cfg.reduction, FrameReduction::None);
        assert_eq!(cfg.inputs.len(), 2);
    }

    #[test]
    fn test_missing_input_and_output() {
        let mut f = flags();
        f.inputs.clear();
        assert_eq!(f.validate(), Err(MriError::MissingInput));

        let mut f = flags();
        f.output = None;
        assert_eq!(f.validate(), Err(MriError::MissingOutput));
    }

    #[test]
    fn test_mean_and_std_conflict() {
        let mut f = flags();
        f.mean = true;
        f.std = true;
        assert!(matches!(f.validate(), Err(MriError::ConflictingOptions(_))));
    }

    #[test]
    fn test_asl_and_std_conflict() {
        let mut f = flags();
        f.asl = true;
        f.std = true;
        assert!(matches!(f.validate(), Err(MriError::ConflictingOptions(_))));
    }

    #[test]
    fn test_max_is_exclusive() {
        let mut f = flags();
        f.max = true;
        f.mean = true;
        assert!(matches!(f.validate(), Err(MriError::ConflictingOptions(_))));

        let mut f = flags();
        f.max = true;
        assert_eq!(f.validate().unwrap().reduction, FrameReduction::Max);
    }

    #[test]
    fn test_avg_and_diff_conflict() {
        let mut f = flags();
        f.paired_avg = true;
        f.paired_diff = true;
        assert!(f.validate().is_err());

        let mut f = flags();
        f.paired_avg = true;
        f.paired_diff_norm2 = true;
        assert!(f.validate().is_err());
    }

    #[test]
    fn test_multiple_norms_conflict() {
        let mut f = flags();
        f.paired_diff_norm1 = true;
        f.paired_diff_norm2 = true;
        let err = f.validate().unwrap_err();
        assert!(err.to_string().contains("--paired-diff-norm1 and --paired-diff-norm2"));

        let mut f = flags();
        f.paired_diff_norm = true;
        f.paired_diff_norm1 = true;
        assert!(f.validate().is_err());
    }

    #[test]
    fn test_norm_wins_over_plain_diff() {
        let mut f = flags();
        f.paired_diff = true;
        f.paired_diff_norm1 = true;
        assert_eq!(f.validate().unwrap().pair_mode, PairMode::PairDiffNorm1);
    }

    #[test]
    fn test_asl_is_paired_diff_then_mean() {
        let mut f = flags();
        f.asl = true;
        let cfg = f.validate().unwrap();
        assert_eq!(cfg.pair_mode, PairMode::PairDiff);
        assert_eq!(cfg.reduction, FrameReduction::Mean);
    }

    #[test]
    fn test_combine_zero_denominators() {
        assert_eq!(PairMode::PairDiffNormAvg.combine(3.0, -3.0), 0.0);
        assert_eq!(PairMode::PairDiffNormAvg.combine(3.0, 1.0), 1.0);
        assert_eq!(PairMode::PairDiffNorm1.combine(0.0, 5.0), 0.0);
        assert_eq!(PairMode::PairDiffNorm1.combine(4.0, 2.0), 0.5);
        assert_eq!(PairMode::PairDiffNorm2.combine(5.0, 0.0), 0.0);
        assert_eq!(PairMode::PairDiffNorm2.combine(6.0, 2.0), 2.0);
        assert_eq!(PairMode::PairAvg.combine(1.0, 2.0), 1.5);
        assert_eq!(PairMode::PairDiff.combine(10.0, 20.0), -10.0);
    }

    #[test]
    fn test_combine_tiny_denominator_is_divided() {
        let tiny = 1e-300;
        let v = PairMode::PairDiffNorm1.combine(tiny, 0.0);
        assert_eq!(v, 1.0);
    }
}
