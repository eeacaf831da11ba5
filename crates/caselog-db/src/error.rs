//! Database error types for caselog-db.

use caselog_core::errors::CoreError;
use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed or returned data that could not be decoded.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// A lookup matched no row.
    #[error("No result returned")]
    NoResult,

    /// Stored data that caselog could not have written.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Domain error raised while validating, diffing or classifying.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Coarse error category surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    /// Stale or mismatched version; nothing was written.
    Conflict,
    /// Rejected before any diffing or writing.
    Validation,
    /// The backing store failed; the transaction was rolled back.
    StoreUnavailable,
    Internal,
}

impl DatabaseError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NoResult | Self::Core(CoreError::NotFound { .. }) => ErrorKind::NotFound,
            Self::Core(CoreError::Conflict { .. }) => ErrorKind::Conflict,
            Self::Core(CoreError::Validation(_)) => ErrorKind::Validation,
            Self::Query(_) | Self::Migration(_) | Self::LibSql(_) => ErrorKind::StoreUnavailable,
            Self::InvalidState(_)
            | Self::Core(CoreError::Serialization(_) | CoreError::Other(_))
            | Self::Other(_) => ErrorKind::Internal,
        }
    }

    pub(crate) fn not_found(entity_type: &str, id: &str) -> Self {
        Self::Core(CoreError::NotFound {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        })
    }

    pub(crate) fn conflict(entity_type: &str, id: &str, expected: u64, actual: u64) -> Self {
        Self::Core(CoreError::Conflict {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
            expected,
            actual,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_the_taxonomy() {
        assert_eq!(DatabaseError::NoResult.kind(), ErrorKind::NotFound);
        assert_eq!(
            DatabaseError::not_found("case", "cas-1").kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            DatabaseError::conflict("case", "cas-1", 1, 2).kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            DatabaseError::Core(CoreError::Validation("bad".into())).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            DatabaseError::Query("boom".into()).kind(),
            ErrorKind::StoreUnavailable
        );
        assert_eq!(
            DatabaseError::InvalidState("odd".into()).kind(),
            ErrorKind::Internal
        );
    }
}
