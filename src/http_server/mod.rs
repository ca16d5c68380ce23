//! # HTTP Server Module
//!
//! Read-only GET surface over the search service.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/reddit/search`, `/reddit/comment/search`, `/reddit/search/comment` - Comment search
//! - `/reddit/search/submission`, `/reddit/submission/search` - Submission search
//! - `/reddit/analyze/user/:author` - User activity
//! - `/get/comment_ids/:id`, `/reddit/submission/comment_ids/:id` - Child comment ids

pub mod routes;
pub mod server;

pub use routes::{health_routes, search_routes, CHILD_IDS_CACHE_CONTROL, SEARCH_CACHE_CONTROL};
pub use server::HttpServer;
