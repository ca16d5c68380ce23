//! archive_search - read-only search API over archived comments and
//! submissions
//!
//! Request flow: raw query string → [`params`] normalization → [`query`]
//! compilation → [`backend`] execution with failover → [`response`] shaping.
//! By-ID and child-ID requests go to the [`relational`] archive instead.

pub mod backend;
pub mod cli;
pub mod config;
pub mod http_server;
pub mod ids;
pub mod logging;
pub mod params;
pub mod query;
pub mod relational;
pub mod response;
pub mod service;
