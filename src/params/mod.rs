//! # Parameter Normalization
//!
//! Turns the loosely-typed, case-insensitive query-string bag a caller sends
//! into [`CanonicalParams`]: defaults applied, aliases resolved, values
//! case-folded and clamped.
//!
//! A malformed parameter never fails the request. It is dropped and reported
//! as a [`ParamIssue`] so the caller can log it.

pub mod canonical;
pub mod errors;
pub mod normalizer;
pub mod raw;

pub use canonical::{
    AggregationKind, BoolFlag, CanonicalParams, Frequency, NumericFilter, SortDirection,
    TextField, TextQuery, DEFAULT_SIZE, DEFAULT_SORT_TYPE, MAX_SIZE, MIN_SIZE,
};
pub use errors::{IssueKind, ParamError, ParamIssue, ParamResult};
pub use normalizer::{normalize, Normalized};
pub use raw::RawParams;
