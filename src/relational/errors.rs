//! # Relational Errors

use thiserror::Error;

/// Result type for relational lookups
pub type StoreResult<T> = Result<T, StoreError>;

/// Outcome of one failed attempt
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryFailure {
    /// Connection-level trouble; worth reconnecting and retrying
    #[error("transient failure: {0}")]
    Transient(String),

    /// The statement itself is wrong; retrying cannot help
    #[error("query failed: {0}")]
    Fatal(String),
}

/// Terminal relational errors. All surface as persistence unavailability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("relational store unavailable after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: String },

    #[error("relational query failed: {0}")]
    Query(String),

    #[error("stored row could not be decoded: {0}")]
    Decode(String),

    #[error("relational connection lock poisoned")]
    Lock,
}
