//! SQLite-backed connector for the relational archive

use std::path::{Path, PathBuf};

use rusqlite::types::Value;
use rusqlite::{params_from_iter, ErrorCode, OpenFlags};

use super::errors::QueryFailure;
use super::store::{Connection, Connector, Row, SqlValue};

/// Opens read-only connections to an archive database file
#[derive(Debug, Clone)]
pub struct SqliteConnector {
    path: PathBuf,
}

impl SqliteConnector {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl Connector for SqliteConnector {
    type Conn = SqliteConnection;

    fn connect(&self) -> Result<SqliteConnection, QueryFailure> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = rusqlite::Connection::open_with_flags(&self.path, flags).map_err(classify)?;
        tracing::debug!(path = %self.path.display(), "opened relational connection");
        Ok(SqliteConnection { conn })
    }
}

/// One open SQLite handle
pub struct SqliteConnection {
    conn: rusqlite::Connection,
}

impl Connection for SqliteConnection {
    fn query(&mut self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>, QueryFailure> {
        let mut stmt = self.conn.prepare(sql).map_err(classify)?;
        let columns = stmt.column_count();
        let bound: Vec<Value> = params.iter().map(to_sqlite).collect();

        let rows = stmt
            .query_map(params_from_iter(bound), |row| {
                (0..columns)
                    .map(|i| row.get::<_, Value>(i).map(from_sqlite))
                    .collect::<Result<Row, _>>()
            })
            .map_err(classify)?;

        rows.collect::<Result<Vec<_>, _>>().map_err(classify)
    }
}

fn to_sqlite(value: &SqlValue) -> Value {
    match value {
        SqlValue::Null => Value::Null,
        SqlValue::Integer(n) => Value::Integer(*n),
        SqlValue::Real(f) => Value::Real(*f),
        SqlValue::Text(s) => Value::Text(s.clone()),
    }
}

fn from_sqlite(value: Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Integer(n) => SqlValue::Integer(n),
        Value::Real(f) => SqlValue::Real(f),
        Value::Text(s) => SqlValue::Text(s),
        Value::Blob(b) => SqlValue::Text(String::from_utf8_lossy(&b).into_owned()),
    }
}

/// Busy, locked and unopenable databases are worth another attempt
fn classify(err: rusqlite::Error) -> QueryFailure {
    match &err {
        rusqlite::Error::SqliteFailure(e, _)
            if matches!(
                e.code,
                ErrorCode::DatabaseBusy
                    | ErrorCode::DatabaseLocked
                    | ErrorCode::CannotOpen
                    | ErrorCode::SystemIoFailure
            ) =>
        {
            QueryFailure::Transient(err.to_string())
        }
        _ => QueryFailure::Fatal(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relational::store::{RelationalStore, RetryPolicy, RetryingStore};
    use std::time::Duration;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("archive.db");
        let conn = rusqlite::Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT);
             INSERT INTO t VALUES (1, 'one'), (2, 'two');",
        )
        .unwrap();
        (dir, path)
    }

    #[test]
    fn test_query_with_params() {
        let (_dir, path) = fixture();
        let mut conn = SqliteConnector::new(&path).connect().unwrap();
        let rows = conn
            .query("SELECT id, name FROM t WHERE id = ?", &[SqlValue::Integer(2)])
            .unwrap();
        assert_eq!(rows, vec![vec![SqlValue::Integer(2), SqlValue::Text("two".into())]]);
    }

    #[test]
    fn test_bad_sql_is_fatal() {
        let (_dir, path) = fixture();
        let mut conn = SqliteConnector::new(&path).connect().unwrap();
        let err = conn.query("SELECT nope FROM t", &[]).unwrap_err();
        assert!(matches!(err, QueryFailure::Fatal(_)));
    }

    #[test]
    fn test_missing_file_is_transient() {
        let dir = TempDir::new().unwrap();
        let err = SqliteConnector::new(dir.path().join("missing.db"))
            .connect()
            .err()
            .unwrap();
        assert!(matches!(err, QueryFailure::Transient(_)));
    }

    #[test]
    fn test_connections_are_read_only() {
        let (_dir, path) = fixture();
        let mut conn = SqliteConnector::new(&path).connect().unwrap();
        assert!(conn.query("INSERT INTO t VALUES (3, 'three')", &[]).is_err());
    }

    #[test]
    fn test_retrying_store_exhausts_on_missing_file() {
        let dir = TempDir::new().unwrap();
        let store = RetryingStore::new(
            SqliteConnector::new(dir.path().join("missing.db")),
            RetryPolicy {
                max_attempts: 2,
                delay: Duration::ZERO,
            },
        );
        let err = store.execute("SELECT 1", &[]).unwrap_err();
        assert!(matches!(err, crate::relational::StoreError::Exhausted { attempts: 2, .. }));
    }
}
