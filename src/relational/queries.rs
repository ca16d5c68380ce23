//! Archive lookups over the relational store
//!
//! Table `comment(id INTEGER PRIMARY KEY, link_id INTEGER NOT NULL, json TEXT NOT NULL)`.
//! `json` holds the stored document; `link_id` is the numeric parent
//! submission id.

use serde_json::{Map, Value};

use super::errors::{StoreError, StoreResult};
use super::store::{RelationalStore, SqlValue};

/// Archive schema, for provisioning and fixtures
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS comment (
    id INTEGER PRIMARY KEY,
    link_id INTEGER NOT NULL,
    json TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS comment_link_id ON comment (link_id);
";

/// Upper bound on child ids returned for one submission
pub const CHILD_ID_LIMIT: i64 = 50_000;

/// Upper bound on ids accepted in one by-ID request
pub const ID_LOOKUP_LIMIT: usize = 500;

/// Fetch stored comment documents by numeric id.
///
/// Returns `(id, document)` pairs in ascending id order; unknown ids are
/// simply absent.
pub fn fetch_comments(store: &dyn RelationalStore, ids: &[u64]) -> StoreResult<Vec<(u64, Map<String, Value>)>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!("SELECT id, json FROM comment WHERE id IN ({placeholders}) ORDER BY id ASC");
    let params = ids
        .iter()
        .map(|&id| to_param(id))
        .collect::<StoreResult<Vec<_>>>()?;

    store
        .execute(&sql, &params)?
        .into_iter()
        .map(|row| {
            let id = row
                .first()
                .and_then(SqlValue::as_i64)
                .and_then(|n| u64::try_from(n).ok())
                .ok_or_else(|| StoreError::Decode("comment row without id".to_string()))?;
            let text = row
                .get(1)
                .and_then(SqlValue::as_str)
                .ok_or_else(|| StoreError::Decode(format!("comment {id} has no document")))?;
            match serde_json::from_str::<Value>(text) {
                Ok(Value::Object(doc)) => Ok((id, doc)),
                Ok(_) => Err(StoreError::Decode(format!("comment {id} is not an object"))),
                Err(e) => Err(StoreError::Decode(format!("comment {id}: {e}"))),
            }
        })
        .collect()
}

/// Ids of comments belonging to a submission, ascending
pub fn comment_ids_for_submission(store: &dyn RelationalStore, submission_id: u64) -> StoreResult<Vec<u64>> {
    let rows = store.execute(
        "SELECT id FROM comment WHERE link_id = ? ORDER BY id ASC LIMIT ?",
        &[to_param(submission_id)?, SqlValue::Integer(CHILD_ID_LIMIT)],
    )?;

    rows.into_iter()
        .map(|row| {
            row.first()
                .and_then(SqlValue::as_i64)
                .and_then(|n| u64::try_from(n).ok())
                .ok_or_else(|| StoreError::Decode("comment id is not a non-negative integer".to_string()))
        })
        .collect()
}

fn to_param(id: u64) -> StoreResult<SqlValue> {
    i64::try_from(id)
        .map(SqlValue::Integer)
        .map_err(|_| StoreError::Decode(format!("id {id} exceeds the storable range")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relational::testing::archive;

    #[test]
    fn test_fetch_comments() {
        let (_dir, store) = archive();
        let docs = fetch_comments(&store, &[11, 10, 99]).unwrap();
        let ids: Vec<u64> = docs.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![10, 11]);
        assert_eq!(docs[0].1["body"], "first");
    }

    #[test]
    fn test_fetch_comments_empty() {
        let (_dir, store) = archive();
        assert!(fetch_comments(&store, &[]).unwrap().is_empty());
    }

    #[test]
    fn test_child_ids_ascending() {
        let (_dir, store) = archive();
        assert_eq!(comment_ids_for_submission(&store, 370).unwrap(), vec![10, 11]);
        assert_eq!(comment_ids_for_submission(&store, 371).unwrap(), vec![12]);
        assert!(comment_ids_for_submission(&store, 999).unwrap().is_empty());
    }

    #[test]
    fn test_oversized_id_rejected() {
        let (_dir, store) = archive();
        assert!(matches!(
            comment_ids_for_submission(&store, u64::MAX),
            Err(StoreError::Decode(_))
        ));
    }
}
