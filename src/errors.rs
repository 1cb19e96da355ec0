//! Error handling for the election store
//!
//! Every failure class gets its own variant so callers can always tell a
//! legitimate negative result ("not found", "rejected") apart from a storage
//! failure. No operation in this crate reports failure through a bare
//! boolean or a null-like sentinel.

use uuid::Uuid;

/// Result type alias for the election store
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the election store
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A referenced entity does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Input or state validation errors
    #[error("Validation failed: {message}")]
    Validation { message: String },

    /// A ledger entry already exists for this (voter, election) pair
    #[error("Duplicate vote: voter {voter_id} already voted in election {election_id}")]
    DuplicateVote { voter_id: String, election_id: Uuid },

    /// Transient storage errors; safe to retry the whole operation
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl Error {
    /// Create a new not-found error
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new duplicate-vote error
    pub fn duplicate_vote(voter_id: impl Into<String>, election_id: Uuid) -> Self {
        Self::DuplicateVote {
            voter_id: voter_id.into(),
            election_id,
        }
    }

    /// Create a new storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create a new internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether the caller may safely retry the failed operation.
    ///
    /// Only storage errors are retryable; admission re-checks the duplicate
    /// condition, so a retried cast can never double-count.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage { .. })
    }
}

/// Convenience macros for creating specific error types
#[macro_export]
macro_rules! storage_error {
    ($msg:expr) => {
        $crate::Error::storage($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::Error::storage(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! validation_error {
    ($msg:expr) => {
        $crate::Error::validation($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::Error::validation(format!($fmt, $($arg)*))
    };
}
