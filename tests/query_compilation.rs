//! Query Compilation Tests
//!
//! Raw parameters through normalization and compilation to the backend
//! query document.

use archive_search::params::{normalize, RawParams, MAX_SIZE};
use archive_search::query::{compile, SearchTarget};
use serde_json::{json, Value};

const NOW: i64 = 1_700_000_000;

// =============================================================================
// Helper Functions
// =============================================================================

fn compiled(pairs: &[(&str, &str)], target: SearchTarget) -> Value {
    let raw = RawParams::from_pairs(pairs.iter().copied());
    let normalized = normalize(&raw, NOW);
    compile(&normalized.params, target).to_json()
}

fn filters(doc: &Value) -> Vec<Value> {
    doc["query"]["bool"]["filter"].as_array().cloned().unwrap_or_default()
}

// =============================================================================
// End-to-End Shape
// =============================================================================

#[test]
fn test_subreddit_size_sort() {
    let doc = compiled(
        &[("subreddit", "python"), ("size", "10"), ("sort", "asc")],
        SearchTarget::Comments,
    );

    assert_eq!(filters(&doc), vec![json!({"terms": {"subreddit": ["python"]}})]);
    assert_eq!(doc["size"], 10);
    assert_eq!(doc["sort"], json!({"created_utc": "asc"}));
    assert!(doc["query"]["bool"].get("must_not").is_none());
    assert!(doc.get("aggs").is_none());
}

#[test]
fn test_compilation_is_deterministic() {
    let pairs = [
        ("author", "Alice,bob"),
        ("q", "rust lifetimes"),
        ("score", ">10"),
        ("aggs", "subreddit,created_utc"),
        ("frequency", "hour"),
    ];
    let first = compiled(&pairs, SearchTarget::Comments);
    for _ in 0..10 {
        assert_eq!(compiled(&pairs, SearchTarget::Comments), first);
    }
}

// =============================================================================
// Size Clamping
// =============================================================================

#[test]
fn test_size_always_in_range() {
    for size in ["-5", "0", "1", "25", "499", "500", "501", "100000", "ten", ""] {
        let doc = compiled(&[("size", size)], SearchTarget::Submissions);
        let n = doc["size"].as_u64().unwrap();
        assert!((1..=MAX_SIZE as u64).contains(&n), "size {size:?} compiled to {n}");
    }
    assert_eq!(compiled(&[], SearchTarget::Comments)["size"], 25);
    assert_eq!(compiled(&[("size", "ten")], SearchTarget::Comments)["size"], 25);
}

// =============================================================================
// Filters
// =============================================================================

#[test]
fn test_boolean_flags() {
    for truthy in ["true", "TRUE", "1"] {
        let doc = compiled(&[("over_18", truthy)], SearchTarget::Submissions);
        assert_eq!(filters(&doc), vec![json!({"term": {"over_18": true}})]);
    }
    for falsy in ["false", "FALSE", "0"] {
        let doc = compiled(&[("is_video", falsy)], SearchTarget::Submissions);
        assert_eq!(filters(&doc), vec![json!({"term": {"is_video": false}})]);
    }
    let doc = compiled(&[("stickied", "maybe")], SearchTarget::Submissions);
    assert!(filters(&doc).is_empty());
}

#[test]
fn test_relative_times() {
    let doc = compiled(&[("after", "1d"), ("before", "2h")], SearchTarget::Comments);
    assert_eq!(
        filters(&doc),
        vec![
            json!({"range": {"created_utc": {"gt": NOW - 86_400}}}),
            json!({"range": {"created_utc": {"lt": NOW - 7_200}}}),
        ]
    );

    let doc = compiled(&[("after", "1500000000")], SearchTarget::Comments);
    assert_eq!(filters(&doc), vec![json!({"range": {"created_utc": {"gt": 1_500_000_000}}})]);
}

#[test]
fn test_bad_parameter_is_dropped_not_fatal() {
    let doc = compiled(&[("after", "yesterday"), ("author", "Alice")], SearchTarget::Comments);
    assert_eq!(filters(&doc), vec![json!({"terms": {"author": ["alice"]}})]);
}

#[test]
fn test_submission_text_and_negation() {
    let doc = compiled(
        &[("title", "rust"), ("q:not", "java"), ("selftext:not", "crab")],
        SearchTarget::Submissions,
    );

    assert_eq!(
        filters(&doc),
        vec![json!({"simple_query_string": {
            "query": "rust",
            "fields": ["title"],
            "default_operator": "and"
        }})]
    );
    let must_not = doc["query"]["bool"]["must_not"].as_array().unwrap();
    assert_eq!(must_not.len(), 2);
}

#[test]
fn test_comment_search_ignores_submission_only_text() {
    let doc = compiled(&[("title", "rust"), ("q", "ownership")], SearchTarget::Comments);
    assert_eq!(
        filters(&doc),
        vec![json!({"simple_query_string": {
            "query": "ownership",
            "fields": ["body"],
            "default_operator": "and"
        }})]
    );
}

// =============================================================================
// Aggregations
// =============================================================================

#[test]
fn test_aggregation_specs() {
    let doc = compiled(
        &[("aggs", "subreddit,created_utc,domain"), ("frequency", "week"), ("min_doc_count", "3")],
        SearchTarget::Submissions,
    );

    let aggs = doc["aggs"].as_object().unwrap();
    assert_eq!(aggs["subreddit"]["significant_terms"]["field"], "subreddit.keyword");
    assert_eq!(aggs["subreddit"]["significant_terms"]["min_doc_count"], 3);
    assert_eq!(aggs["created_utc"]["date_histogram"]["interval"], "week");
    assert_eq!(aggs["domain"]["terms"]["field"], "domain.keyword");
}

#[test]
fn test_submission_only_aggregations_skipped_for_comments() {
    let doc = compiled(&[("aggs", "domain,time_of_day,author")], SearchTarget::Comments);
    let aggs = doc["aggs"].as_object().unwrap();
    assert_eq!(aggs.keys().collect::<Vec<_>>(), vec!["author"]);
}
