//! Error types shared by the volume tools

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MriError>;

/// Every failure is fatal to the run that hits it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MriError {
    #[error("dimension mismatch between {first} and {offending}")]
    DimensionMismatch { first: String, offending: String },
    #[error("paired mode specified but there are an odd number of frames ({nframes})")]
    OddFrameCount { nframes: usize },
    #[error("cannot compute std from {nframes} frame(s)")]
    InsufficientFrames { nframes: usize },
    #[error("conflicting options: {0}")]
    ConflictingOptions(String),
    #[error("no inputs specified")]
    MissingInput,
    #[error("no output specified")]
    MissingOutput,
    #[error("I/O failure on '{path}': {reason}")]
    Io { path: String, reason: String },
    #[error("malformed volume data: {0}")]
    Format(String),
    #[error("could not read transform: {0}")]
    TransformParse(String),
    #[error("invalid label '{0}'")]
    InvalidLabel(String),
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl MriError {
    pub(crate) fn io(path: impl std::fmt::Display, reason: impl std::fmt::Display) -> Self {
        MriError::Io {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }
}
