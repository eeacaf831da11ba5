//! Cross-cutting error types for caselog.
//!
//! Errors raised by pure domain logic (validation, diffing, classification).
//! Storage errors live in `caselog-db` and wrap these.

use thiserror::Error;

/// Errors that can be raised by any caselog crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("{entity_type} {id} does not exist")]
    NotFound { entity_type: String, id: String },

    /// Optimistic concurrency check failed: the caller's view of the entity
    /// is not the stored one.
    #[error("Conflict on {entity_type} {id}: expected version {expected}, found {actual}")]
    Conflict {
        entity_type: String,
        id: String,
        expected: u64,
        actual: u64,
    },

    /// Request failed validation (malformed patch, unknown field, bad value).
    #[error("Validation error: {0}")]
    Validation(String),

    /// A value could not be captured as text for the audit trail.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CoreError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn conflict(entity_type: &str, id: &str, expected: u64, actual: u64) -> Self {
        Self::Conflict {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
            expected,
            actual,
        }
    }
}
