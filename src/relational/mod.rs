//! # Relational Lookup
//!
//! Synchronous `execute(sql, params) -> rows` over the relational archive,
//! with bounded retry-and-reconnect. Used for by-ID comment retrieval and
//! child-ID enumeration.
//!
//! The connection handle is shared across requests; access is serialized
//! through a mutex so reconnects never race.

pub mod errors;
pub mod queries;
pub mod sqlite;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use errors::{QueryFailure, StoreError, StoreResult};
pub use queries::{comment_ids_for_submission, fetch_comments, CHILD_ID_LIMIT, ID_LOOKUP_LIMIT, SCHEMA};
pub use sqlite::{SqliteConnection, SqliteConnector};
pub use store::{Connection, Connector, RelationalStore, RetryPolicy, RetryingStore, Row, SqlValue};
