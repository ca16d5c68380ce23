//! Application context over the shared doubles, for the service and HTTP
//! tests

use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use crate::backend::{EndpointSet, SearchExecutor};
use crate::relational::testing::archive;

pub use crate::backend::testing::CannedTransport;

use super::AppContext;

pub const PRIMARY: &str = "http://primary";
pub const SECONDARY: &str = "http://secondary";
pub const NOW: i64 = 1_700_000_000;

pub fn comments_url(base: &str) -> String {
    format!("{base}/rc/comments/_search")
}

pub fn submissions_url(base: &str) -> String {
    format!("{base}/rs/submissions/_search")
}

pub fn context(transport: Arc<CannedTransport>) -> (TempDir, AppContext) {
    let (dir, store) = archive();
    let executor = SearchExecutor::new(
        transport,
        EndpointSet {
            primary: PRIMARY.to_string(),
            secondary: SECONDARY.to_string(),
            comment_index: "/rc/comments/_search".to_string(),
            submission_index: "/rs/submissions/_search".to_string(),
        },
        Duration::from_secs(1),
    );
    let ctx = AppContext::new(executor, Arc::new(store)).with_clock(|| NOW);
    (dir, ctx)
}
