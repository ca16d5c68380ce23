//! # Application Context
//!
//! Built once at startup and shared read-only across requests.

use std::sync::Arc;

use crate::backend::{SearchExecutor, Transport};
use crate::config::ServiceConfig;
use crate::relational::{RelationalStore, RetryingStore, SqliteConnector};

/// Epoch-seconds clock
pub type Clock = fn() -> i64;

fn system_clock() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Shared collaborators of every request
pub struct AppContext {
    executor: SearchExecutor,
    store: Arc<dyn RelationalStore>,
    clock: Clock,
}

impl AppContext {
    pub fn new(executor: SearchExecutor, store: Arc<dyn RelationalStore>) -> Self {
        Self {
            executor,
            store,
            clock: system_clock,
        }
    }

    /// Wire the production collaborators described by `config`.
    pub fn from_config(config: &ServiceConfig, transport: Arc<dyn Transport>) -> Self {
        let executor = SearchExecutor::new(transport, config.search.endpoints(), config.search.timeout());
        let store = RetryingStore::new(
            SqliteConnector::new(&config.relational.path),
            config.relational.retry_policy(),
        );
        Self::new(executor, Arc::new(store))
    }

    /// Replace the clock relative times resolve against
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn executor(&self) -> &SearchExecutor {
        &self.executor
    }

    pub fn store(&self) -> &dyn RelationalStore {
        self.store.as_ref()
    }

    pub fn now(&self) -> i64 {
        (self.clock)()
    }
}
