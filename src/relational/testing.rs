//! Seeded archive shared by the relational, service and HTTP tests

use std::time::Duration;

use tempfile::TempDir;

use super::{RetryPolicy, RetryingStore, SqliteConnector, SCHEMA};

/// Comments 10, 11 (submission 370) and 12 (submission 371)
pub fn archive() -> (TempDir, RetryingStore<SqliteConnector>) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("archive.db");
    let conn = rusqlite::Connection::open(&path).unwrap();
    conn.execute_batch(SCHEMA).unwrap();
    conn.execute_batch(
        r#"INSERT INTO comment VALUES (11, 370, '{"body":"reply","link_id":370,"parent_id":10,"name":"stale"}');
           INSERT INTO comment VALUES (12, 371, '{"body":"other","link_id":371}');
           INSERT INTO comment VALUES (10, 370, '{"body":"first","link_id":370,"parent_id":370,"subreddit_id":1}');"#,
    )
    .unwrap();
    drop(conn);

    let store = RetryingStore::new(
        SqliteConnector::new(&path),
        RetryPolicy {
            max_attempts: 1,
            delay: Duration::ZERO,
        },
    );
    (dir, store)
}
