//! # Response Normalizer
//!
//! Maps raw backend documents to the public record shape: identifiers
//! re-encoded, relationship prefixes restored, escaped text decoded, derived
//! fields added and, last of all, the caller's field projection applied.

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::ids::{encode_unsigned, with_prefix, IdPrefix};

use super::html;
use super::raw::RawHit;

/// Base of canonical permalinks
pub const PERMALINK_BASE: &str = "https://www.reddit.com";

/// Text fields stored HTML-escaped
const ESCAPED_FIELDS: &[&str] = &["author_flair_text", "author_flair_css_class"];

/// Which entity a record represents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Comment,
    Submission,
}

impl RecordKind {
    pub fn prefix(&self) -> IdPrefix {
        match self {
            RecordKind::Comment => IdPrefix::Comment,
            RecordKind::Submission => IdPrefix::Submission,
        }
    }
}

/// A public comment or submission record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

/// Normalize one search hit. The hit's `_id` is the authoritative id.
pub fn normalize_hit(hit: RawHit, kind: RecordKind, projection: Option<&BTreeSet<String>>) -> Record {
    let id = hit.numeric_id();
    normalize_document(hit.source, id, kind, projection)
}

/// Normalize a stored document. When `id` is `None` the document's own
/// integer `id` field is used.
pub fn normalize_document(
    mut fields: Map<String, Value>,
    id: Option<u64>,
    kind: RecordKind,
    projection: Option<&BTreeSet<String>>,
) -> Record {
    let id = id.or_else(|| fields.get("id").and_then(integer_id));
    if let Some(id) = id {
        let encoded = encode_unsigned(id);
        fields.insert("name".to_string(), Value::String(with_prefix(&encoded, kind.prefix())));
        fields.insert("id".to_string(), Value::String(encoded));
    }

    if kind == RecordKind::Comment {
        restore_comment_relations(&mut fields);
    }

    let subreddit_id = fields
        .get("subreddit_id")
        .and_then(integer_id)
        .map(|n| Value::String(with_prefix(&encode_unsigned(n), IdPrefix::Subreddit)))
        .unwrap_or(Value::Null);
    fields.insert("subreddit_id".to_string(), subreddit_id);

    for field in ESCAPED_FIELDS {
        let decoded = fields
            .get(*field)
            .and_then(Value::as_str)
            .map(html::unescape)
            .filter(|text| !text.is_empty())
            .map(Value::String)
            .unwrap_or(Value::Null);
        fields.insert(field.to_string(), decoded);
    }

    if kind == RecordKind::Submission {
        if let Some(link) = full_link(&fields) {
            fields.insert("full_link".to_string(), Value::String(link));
        }
    }

    if let Some(allowed) = projection {
        project(&mut fields, allowed);
    }

    Record { fields }
}

/// `link_id` always gets `t3_`. `parent_id` points at the submission when it
/// is absent or equal to `link_id`, otherwise at the parent comment.
fn restore_comment_relations(fields: &mut Map<String, Value>) {
    let link_id = fields.get("link_id").and_then(integer_id);
    let parent_id = fields.get("parent_id").and_then(integer_id);
    let parent_missing = fields.get("parent_id").map_or(true, Value::is_null);

    if let Some(link) = link_id {
        let link_fullname = with_prefix(&encode_unsigned(link), IdPrefix::Submission);
        fields.insert("link_id".to_string(), Value::String(link_fullname.clone()));

        if parent_missing || parent_id == Some(link) {
            fields.insert("parent_id".to_string(), Value::String(link_fullname));
            return;
        }
    }

    if let Some(parent) = parent_id {
        fields.insert(
            "parent_id".to_string(),
            Value::String(with_prefix(&encode_unsigned(parent), IdPrefix::Comment)),
        );
    }
}

/// Canonical permalink URL derived from the stored relative permalink
pub fn full_link(fields: &Map<String, Value>) -> Option<String> {
    fields
        .get("permalink")
        .and_then(Value::as_str)
        .filter(|p| !p.is_empty())
        .map(|p| format!("{}{}", PERMALINK_BASE, p))
}

/// Keep only fields whose case-folded name is in `allowed`
fn project(fields: &mut Map<String, Value>, allowed: &BTreeSet<String>) {
    fields.retain(|key, _| allowed.contains(&key.to_lowercase()));
}

/// A well-formed backend integer id
pub fn integer_id(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        _ => None,
    }
}
