//! Error types for TerraCover

use thiserror::Error;

/// Main error type for TerraCover operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid raster dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Index out of bounds: ({row}, {col}) in raster of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Raster size mismatch: expected ({er}, {ec}), got ({ar}, {ac})")]
    SizeMismatch { er: usize, ec: usize, ar: usize, ac: usize },

    #[error("Invalid date range: {start} > {end}")]
    InvalidRange { start: String, end: String },

    #[error("Unknown period frequency: {0}")]
    UnknownFrequency(String),

    #[error("Unknown reducer: {0}")]
    UnknownReducer(String),

    #[error("Band count mismatch: expected {expected}, got {actual}")]
    BandMismatch { expected: usize, actual: usize },

    #[error("Unknown band: {0}")]
    UnknownBand(String),

    #[error("No images fall within interval {start}..{end}")]
    EmptyInterval { start: String, end: String },

    #[error("Sampling region yielded no valid points")]
    EmptyRegion,

    #[error("Class label count mismatch: matrix has {expected} classes, got {actual} labels")]
    LabelMismatch { expected: usize, actual: usize },

    #[error("Backend call exceeded timeout of {0} ms")]
    BackendTimeout(u128),

    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for TerraCover operations
pub type Result<T> = std::result::Result<T, Error>;
