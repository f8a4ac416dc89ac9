//! Error types for the vector-search data layer.

use thiserror::Error;

/// Errors raised locally, before any request reaches the service.
#[derive(Debug, Error)]
pub enum DataError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Parallel point columns do not line up
    #[error("Length mismatch: expected {expected} {field}, got {actual}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A payload record encoded to something other than a struct
    #[error("Payload must encode to a struct, got {0}")]
    PayloadNotObject(&'static str),
}
