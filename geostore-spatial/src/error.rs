//! Error types for geometry parsing and normalization.

use thiserror::Error;

/// Errors that can occur while reading or normalizing a geometry.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SpatialError {
    /// The document looks like a geometry but its shape is wrong.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// The `type` member names something that is not a geometry.
    #[error("Unsupported geometry type: {0}")]
    UnsupportedType(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for spatial operations
pub type SpatialResult<T> = Result<T, SpatialError>;

impl From<serde_json::Error> for SpatialError {
    fn from(err: serde_json::Error) -> Self {
        SpatialError::Serialization(err.to_string())
    }
}
