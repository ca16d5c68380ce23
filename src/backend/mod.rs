//! # Retrieval Executor
//!
//! Sends compiled queries to the search backend. A failed primary attempt is
//! retransmitted once, byte-for-byte, to the secondary endpoint.

pub mod errors;
pub mod executor;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use errors::{BackendError, BackendResult, TransportError};
pub use executor::{EndpointSet, SearchExecutor, DEFAULT_TIMEOUT};
pub use transport::{HttpTransport, Transport};
