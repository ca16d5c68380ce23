//! # Service
//!
//! The five read-only operations behind the HTTP surface. Each runs on a
//! blocking thread, owns nothing between calls and either fully succeeds or
//! fails with an [`ApiError`].

pub mod context;
pub mod errors;
pub mod lookup;
pub mod search;

pub use context::AppContext;
pub use errors::{ApiError, ApiResult};
pub use lookup::{comment_ids, user_activity};
pub use search::{search, search_comments, search_submissions};

#[cfg(test)]
pub(crate) mod testing;
