//! Error types for tilemath

use thiserror::Error;

/// Main error type for tilemath operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("not enough input bands: algorithm requires {required}, tile has {provided}")]
    BandCount { required: usize, provided: usize },

    #[error("band size mismatch: expected ({er}, {ec}), got ({ar}, {ac})")]
    SizeMismatch {
        er: usize,
        ec: usize,
        ar: usize,
        ac: usize,
    },

    #[error("band name count mismatch: {names} names for {bands} bands")]
    BandNameCount { names: usize, bands: usize },

    #[error("band index {index} out of bounds for tile with {nbands} bands")]
    BandIndexOutOfBounds { index: usize, nbands: usize },

    /// Degenerate tile content with no deterministic fallback. Kernels
    /// with a documented fallback (e.g. Otsu's all-zero classification
    /// on constant input) resolve silently instead of raising this;
    /// the variant is reserved for algorithms that cannot.
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("invalid parameter document: {0}")]
    ParameterParse(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for tilemath operations
pub type Result<T> = std::result::Result<T, Error>;
