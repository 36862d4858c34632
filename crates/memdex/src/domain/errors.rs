//! Domain Errors
//!
//! A single error taxonomy for every memory store operation, so callers can
//! match on one type regardless of the backend in use.

use thiserror::Error;

/// Memory store errors
#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("An embedding generator is required to build a memory store")]
    MissingEmbeddingGenerator,

    #[error("Index {0} does not exist")]
    IndexNotFound(String),

    #[error("Index operation failed on {index}: {reason}")]
    IndexOperation { index: String, reason: String },

    #[error("Failed bulk indexing memory records in index {index} - {}", .errors.join("; "))]
    BulkWrite { index: String, errors: Vec<String> },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),
}

impl MemoryError {
    pub fn index_operation<I: AsRef<str>, R: Into<String>>(index: I, reason: R) -> Self {
        Self::IndexOperation {
            index: index.as_ref().to_string(),
            reason: reason.into(),
        }
    }

    pub fn invalid_argument<T: Into<String>>(message: T) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Whether the error means the target index is absent
    pub fn is_index_not_found(&self) -> bool {
        matches!(self, Self::IndexNotFound(_))
    }
}

impl From<serde_json::Error> for MemoryError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}
