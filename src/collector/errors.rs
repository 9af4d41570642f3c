//! Collection errors
//!
//! A `ValidationError` costs one attempt and is recoverable. A
//! `CollectError` ends the whole fill operation.

use thiserror::Error;

use crate::document::DocumentError;

/// Result type for collection
pub type CollectResult<T> = Result<T, CollectError>;

/// Why a single input was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} cannot exceed {max} bytes (got {len})")]
    TooLong { field: String, len: usize, max: usize },

    #[error("{field} must be an integer, got '{value}'")]
    NotNumeric { field: String, value: String },

    #[error("{field} must be in the range of [{min} to {max}], got {value}")]
    OutOfRange {
        field: String,
        value: i64,
        min: i64,
        max: i64,
    },
}

/// Fatal collection failures
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("Max tries expired for '{field}' after {attempts} attempts")]
    RetriesExhausted { field: String, attempts: u32 },

    #[error("Collection cancelled while waiting for '{field}'")]
    Cancelled { field: String },

    #[error(transparent)]
    Document(#[from] DocumentError),
}

impl CollectError {
    /// Field the failure relates to, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            CollectError::RetriesExhausted { field, .. } | CollectError::Cancelled { field } => {
                Some(field)
            }
            CollectError::Document(_) => None,
        }
    }
}
