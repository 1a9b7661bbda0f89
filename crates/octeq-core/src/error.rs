//! Error types for octeq

use thiserror::Error;

/// Core error type
///
/// Every variant except `Io` and `Serialization` is an initialization-time
/// misconfiguration. Block processing itself never fails.
#[derive(Error, Debug)]
pub enum EqError {
    #[error(
        "coefficient table has {actual} values, expected {expected} ({bands} bands x {stages} stages x 5)"
    )]
    CoefficientTableLength {
        expected: usize,
        actual: usize,
        bands: usize,
        stages: usize,
    },

    #[error("band count mismatch: configuration declares {expected}, coefficient table declares {actual}")]
    BandCountMismatch { expected: usize, actual: usize },

    #[error("stage count mismatch: configuration declares {expected}, coefficient table declares {actual}")]
    StageCountMismatch { expected: usize, actual: usize },

    #[error("postshift mismatch: configuration declares {expected}, coefficient table declares {actual}")]
    PostshiftMismatch { expected: u32, actual: u32 },

    #[error("postshift {postshift} out of range (max {max})")]
    InvalidPostshift { postshift: u32, max: u32 },

    #[error("shift exponent {0} out of range (-31..=31)")]
    InvalidShift(i32),

    #[error("{what}: expected {expected} entries, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("coefficient overflow in band {band}, stage {stage}: negated feedback term does not fit Q31")]
    CoefficientOverflow { band: usize, stage: usize },

    #[error("band index {index} out of range ({bands} bands)")]
    BandIndex { index: usize, bands: usize },

    #[error("stage index {index} out of range ({stages} stages per band)")]
    StageIndex { index: usize, stages: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParam(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias
pub type EqResult<T> = Result<T, EqError>;
