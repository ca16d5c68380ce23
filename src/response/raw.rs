//! # Raw Backend Responses
//!
//! Wire shapes returned by the search backend, deserialized as-is.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value};

/// Top-level search response
#[derive(Debug, Clone, Deserialize)]
pub struct RawSearchResponse {
    #[serde(default)]
    pub took: u64,
    #[serde(default)]
    pub timed_out: bool,
    #[serde(rename = "_shards", default)]
    pub shards: Value,
    #[serde(default)]
    pub hits: RawHits,
    #[serde(default)]
    pub aggregations: BTreeMap<String, RawAggregation>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawHits {
    /// Either a bare count or `{"value": n, "relation": ...}`
    #[serde(default)]
    pub total: Value,
    #[serde(default)]
    pub hits: Vec<RawHit>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawHit {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_source", default)]
    pub source: Map<String, Value>,
}

impl RawHit {
    /// The backend-native integer id, if `_id` is numeric
    pub fn numeric_id(&self) -> Option<u64> {
        self.id.trim().parse().ok()
    }
}

/// One aggregation result. Significant-terms aggregations also report the
/// foreground and background totals.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAggregation {
    #[serde(default)]
    pub buckets: Vec<RawBucket>,
    pub doc_count: Option<u64>,
    pub bg_count: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawBucket {
    pub key: Value,
    #[serde(default)]
    pub doc_count: u64,
    pub bg_count: Option<u64>,
    pub score: Option<f64>,
    pub key_as_string: Option<String>,
}
