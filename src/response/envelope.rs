//! # Response Envelopes
//!
//! Every endpoint answers `{"data": ..., "metadata": {...}}`; failures answer
//! `{"error": ..., "message": ...}`.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::params::CanonicalParams;

use super::aggregations::Aggregations;
use super::raw::RawSearchResponse;

/// API version tag carried in every metadata block
pub const API_VERSION: &str = "v3.0";

/// Search-specific metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchMetadata {
    pub size: usize,
    pub sort: String,
    pub sort_type: String,
    pub results_returned: usize,
    pub timed_out: bool,
    pub total_results: Value,
    pub shards: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<i64>,
}

impl SearchMetadata {
    pub fn new(params: &CanonicalParams, response: &RawSearchResponse) -> Self {
        Self {
            size: params.size,
            sort: params.sort.as_str().to_string(),
            sort_type: params.sort_type.clone(),
            results_returned: response.hits.hits.len(),
            timed_out: response.timed_out,
            total_results: response.hits.total.clone(),
            shards: response.shards.clone(),
            after: params.after,
        }
    }
}

/// Metadata block
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metadata {
    pub execution_time_milliseconds: f64,
    pub version: &'static str,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub search: Option<SearchMetadata>,
}

impl Metadata {
    pub fn new(elapsed: Duration) -> Self {
        Self {
            execution_time_milliseconds: round_millis(elapsed),
            version: API_VERSION,
            search: None,
        }
    }

    pub fn with_search(mut self, search: SearchMetadata) -> Self {
        self.search = Some(search);
        self
    }
}

fn round_millis(elapsed: Duration) -> f64 {
    (elapsed.as_secs_f64() * 1000.0 * 100.0).round() / 100.0
}

/// Successful response
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T: Serialize> {
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggs: Option<Aggregations>,
    pub metadata: Metadata,
}

impl<T: Serialize> Envelope<T> {
    pub fn new(data: T, metadata: Metadata) -> Self {
        Self {
            data,
            aggs: None,
            metadata,
        }
    }

    /// Attach aggregations; an empty set is omitted
    pub fn with_aggs(mut self, aggs: Aggregations) -> Self {
        if !aggs.is_empty() {
            self.aggs = Some(aggs);
        }
        self
    }
}

/// Failure response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorEnvelope {
    pub error: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_metadata() {
        let envelope = Envelope::new(vec!["a", "b"], Metadata::new(Duration::from_micros(12_346)));
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["data"], json!(["a", "b"]));
        assert_eq!(json["metadata"]["execution_time_milliseconds"], 12.35);
        assert_eq!(json["metadata"]["version"], "v3.0");
        assert!(json.get("aggs").is_none());
        assert!(json["metadata"].get("size").is_none());
    }

    #[test]
    fn test_search_metadata_is_flattened() {
        let params = CanonicalParams {
            after: Some(5),
            ..Default::default()
        };
        let response: RawSearchResponse = serde_json::from_value(json!({
            "timed_out": false,
            "_shards": { "total": 1 },
            "hits": { "total": 7, "hits": [] }
        }))
        .unwrap();

        let metadata = Metadata::new(Duration::ZERO).with_search(SearchMetadata::new(&params, &response));
        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json["size"], 25);
        assert_eq!(json["sort"], "desc");
        assert_eq!(json["sort_type"], "created_utc");
        assert_eq!(json["results_returned"], 0);
        assert_eq!(json["total_results"], 7);
        assert_eq!(json["shards"], json!({ "total": 1 }));
        assert_eq!(json["after"], 5);
    }
}
