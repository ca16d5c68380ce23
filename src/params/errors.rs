//! # Parameter Errors
//!
//! Errors here are recovered locally: the offending parameter is dropped and
//! the request continues.

use std::fmt;

use thiserror::Error;

/// Result type for single-parameter parsing
pub type ParamResult<T> = Result<T, ParamError>;

/// Why a single parameter value was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    #[error("expected an integer, got {0:?}")]
    NotAnInteger(String),

    #[error("expected an epoch integer or <integer><s|m|h|d>, got {0:?}")]
    InvalidTime(String),

    #[error("expected <N, >N or N, got {0:?}")]
    InvalidComparison(String),

    #[error("expected true, false, 1 or 0, got {0:?}")]
    InvalidBoolean(String),

    #[error("expected asc or desc, got {0:?}")]
    InvalidDirection(String),

    #[error("expected second, minute, hour, day, week or month, got {0:?}")]
    InvalidFrequency(String),

    #[error("unknown aggregation {0:?}")]
    UnknownAggregation(String),
}

/// How a parameter was treated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    /// Recognized key with a value that failed validation
    Invalid(ParamError),
    /// Unrecognized key
    Ignored,
}

/// A parameter that did not make it into the canonical set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamIssue {
    pub key: String,
    pub value: String,
    pub kind: IssueKind,
}

impl ParamIssue {
    pub fn invalid(key: &str, value: &str, error: ParamError) -> Self {
        Self {
            key: key.to_string(),
            value: value.to_string(),
            kind: IssueKind::Invalid(error),
        }
    }

    pub fn ignored(key: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            value: value.to_string(),
            kind: IssueKind::Ignored,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self.kind, IssueKind::Invalid(_))
    }
}

impl fmt::Display for ParamIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            IssueKind::Invalid(err) => write!(f, "{}: {}", self.key, err),
            IssueKind::Ignored => write!(f, "{}: unrecognized parameter", self.key),
        }
    }
}
