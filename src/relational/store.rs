//! # Retrying Store
//!
//! Wraps a [`Connector`] with retry-and-reconnect: on a transient failure the
//! connection is dropped, the store sleeps for the policy delay, reconnects
//! and tries again, up to `max_attempts` in total.

use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use super::errors::{QueryFailure, StoreError, StoreResult};

/// A bound parameter or returned column value
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl SqlValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SqlValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// One result row
pub type Row = Vec<SqlValue>;

/// An open connection
pub trait Connection: Send {
    fn query(&mut self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>, QueryFailure>;
}

/// Opens connections
pub trait Connector: Send + Sync {
    type Conn: Connection;

    fn connect(&self) -> Result<Self::Conn, QueryFailure>;
}

/// The capability the service layer depends on
pub trait RelationalStore: Send + Sync {
    fn execute(&self, sql: &str, params: &[SqlValue]) -> StoreResult<Vec<Row>>;
}

/// Retry bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay: Duration::from_secs(1),
        }
    }
}

/// Store that reconnects and retries on transient failures
pub struct RetryingStore<C: Connector> {
    connector: C,
    connection: Mutex<Option<C::Conn>>,
    policy: RetryPolicy,
}

impl<C: Connector> RetryingStore<C> {
    /// Create the store. The first connection is opened on first use.
    pub fn new(connector: C, policy: RetryPolicy) -> Self {
        Self {
            connector,
            connection: Mutex::new(None),
            policy,
        }
    }

    fn attempt(&self, slot: &mut Option<C::Conn>, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>, QueryFailure> {
        if slot.is_none() {
            *slot = Some(self.connector.connect()?);
        }
        match slot.as_mut() {
            Some(conn) => conn.query(sql, params),
            None => Err(QueryFailure::Transient("no connection".to_string())),
        }
    }
}

impl<C: Connector> RelationalStore for RetryingStore<C> {
    fn execute(&self, sql: &str, params: &[SqlValue]) -> StoreResult<Vec<Row>> {
        let mut slot = self.connection.lock().map_err(|_| StoreError::Lock)?;
        let attempts = self.policy.max_attempts.max(1);
        let mut last = String::new();

        for attempt in 1..=attempts {
            match self.attempt(&mut slot, sql, params) {
                Ok(rows) => return Ok(rows),
                Err(QueryFailure::Fatal(message)) => {
                    tracing::error!(error = %message, "relational query failed");
                    return Err(StoreError::Query(message));
                }
                Err(QueryFailure::Transient(message)) => {
                    tracing::warn!(
                        attempt,
                        remaining = attempts - attempt,
                        error = %message,
                        "relational operation failed, reconnecting"
                    );
                    *slot = None;
                    last = message;
                    if attempt < attempts {
                        thread::sleep(self.policy.delay);
                    }
                }
            }
        }

        tracing::error!(attempts, "relational operation failed after all retries");
        Err(StoreError::Exhausted { attempts, last })
    }
}
