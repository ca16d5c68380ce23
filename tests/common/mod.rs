//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use archive_search::backend::{EndpointSet, SearchExecutor, Transport, TransportError};
use archive_search::relational::{RetryPolicy, RetryingStore, SqliteConnector, SCHEMA};
use archive_search::service::AppContext;
use serde_json::Value;
use tempfile::TempDir;

pub const PRIMARY: &str = "http://es-primary:9200";
pub const SECONDARY: &str = "http://es-secondary:9200";
pub const NOW: i64 = 1_700_000_000;

pub fn comments_url(base: &str) -> String {
    format!("{base}/rc/comments/_search")
}

pub fn submissions_url(base: &str) -> String {
    format!("{base}/rs/submissions/_search")
}

/// Records every request; answers from a URL table, refusing unknown URLs
#[derive(Default)]
pub struct RecordingTransport {
    responses: HashMap<String, Result<String, TransportError>>,
    requests: Mutex<Vec<(String, String)>>,
}

impl RecordingTransport {
    pub fn respond(mut self, url: &str, body: Value) -> Self {
        self.responses.insert(url.to_string(), Ok(body.to_string()));
        self
    }

    pub fn fail(mut self, url: &str, err: TransportError) -> Self {
        self.responses.insert(url.to_string(), Err(err));
        self
    }

    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for RecordingTransport {
    fn send(&self, url: &str, body: &str, _timeout: Duration) -> Result<String, TransportError> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), body.to_string()));
        match self.responses.get(url) {
            Some(outcome) => outcome.clone(),
            None => Err(TransportError::Connect {
                url: url.to_string(),
                message: "connection refused".to_string(),
            }),
        }
    }
}

pub fn endpoints() -> EndpointSet {
    EndpointSet {
        primary: PRIMARY.to_string(),
        secondary: SECONDARY.to_string(),
        comment_index: "/rc/comments/_search".to_string(),
        submission_index: "/rs/submissions/_search".to_string(),
    }
}

pub fn executor(transport: Arc<RecordingTransport>) -> SearchExecutor {
    SearchExecutor::new(transport, endpoints(), Duration::from_secs(5))
}

/// Create an archive database at `path` holding `comments` as
/// `(id, link_id, json)` rows.
pub fn seed_archive(path: &Path, comments: &[(i64, i64, &str)]) {
    let conn = rusqlite::Connection::open(path).unwrap();
    conn.execute_batch(SCHEMA).unwrap();
    for (id, link_id, json) in comments {
        conn.execute(
            "INSERT INTO comment (id, link_id, json) VALUES (?1, ?2, ?3)",
            rusqlite::params![id, link_id, json],
        )
        .unwrap();
    }
}

pub fn store_at(path: &Path) -> RetryingStore<SqliteConnector> {
    RetryingStore::new(
        SqliteConnector::new(path),
        RetryPolicy {
            max_attempts: 2,
            delay: Duration::ZERO,
        },
    )
}

/// Context over `transport` and a seeded archive
pub fn app(transport: Arc<RecordingTransport>, comments: &[(i64, i64, &str)]) -> (TempDir, AppContext) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("archive.db");
    seed_archive(&path, comments);
    let ctx = AppContext::new(executor(transport), Arc::new(store_at(&path))).with_clock(|| NOW);
    (dir, ctx)
}
