//! # Query Compilation
//!
//! Canonical parameters are compiled into a typed [`QueryDocument`] that
//! serializes to the search backend's JSON query DSL. Compilation is pure:
//! the same parameters always produce the same document.

pub mod compiler;
pub mod document;
pub mod target;

pub use compiler::{compile, compile_id_lookup, compile_user_activity};
pub use document::{
    AggregationSpec, Predicate, QueryBuilder, QueryDocument, RangeBound, SortSpec,
};
pub use target::SearchTarget;
