//! # Search Executor
//!
//! Blocking, fixed-timeout execution with a single failover to the secondary
//! endpoint. The query body is serialized once and the same bytes are sent to
//! both endpoints.

use std::sync::Arc;
use std::time::Duration;

use crate::query::{QueryDocument, SearchTarget};
use crate::response::RawSearchResponse;

use super::errors::{BackendError, BackendResult};
use super::transport::Transport;

/// Per-attempt timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Primary and secondary backend locations plus per-collection search paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointSet {
    pub primary: String,
    pub secondary: String,
    pub comment_index: String,
    pub submission_index: String,
}

impl EndpointSet {
    fn index(&self, target: SearchTarget) -> &str {
        match target {
            SearchTarget::Comments => &self.comment_index,
            SearchTarget::Submissions => &self.submission_index,
        }
    }

    pub fn primary_url(&self, target: SearchTarget) -> String {
        join_url(&self.primary, self.index(target))
    }

    pub fn secondary_url(&self, target: SearchTarget) -> String {
        join_url(&self.secondary, self.index(target))
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Executes query documents against the search backend
pub struct SearchExecutor {
    transport: Arc<dyn Transport>,
    endpoints: EndpointSet,
    timeout: Duration,
}

impl SearchExecutor {
    pub fn new(transport: Arc<dyn Transport>, endpoints: EndpointSet, timeout: Duration) -> Self {
        Self {
            transport,
            endpoints,
            timeout,
        }
    }

    /// Run `doc` against `target` and decode the response.
    pub fn execute(
        &self,
        target: SearchTarget,
        doc: &QueryDocument,
    ) -> BackendResult<RawSearchResponse> {
        let text = self.execute_raw(target, doc)?;
        serde_json::from_str(&text).map_err(|err| BackendError::MalformedResponse(err.to_string()))
    }

    /// Run `doc` against `target`, returning the response text.
    pub fn execute_raw(&self, target: SearchTarget, doc: &QueryDocument) -> BackendResult<String> {
        let body = doc.to_body();

        let primary_url = self.endpoints.primary_url(target);
        let primary = match self.transport.send(&primary_url, &body, self.timeout) {
            Ok(text) => return Ok(text),
            Err(err) => err,
        };
        tracing::warn!(error = %primary, "primary search endpoint failed, trying secondary");

        let secondary_url = self.endpoints.secondary_url(target);
        match self.transport.send(&secondary_url, &body, self.timeout) {
            Ok(text) => Ok(text),
            Err(secondary) => {
                tracing::error!(
                    primary = %primary,
                    secondary = %secondary,
                    "both search endpoints failed"
                );
                Err(BackendError::Unavailable { primary, secondary })
            }
        }
    }
}
