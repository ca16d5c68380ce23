//! Failover Tests
//!
//! A failed primary attempt is retransmitted exactly once, byte-for-byte, to
//! the secondary endpoint.

mod common;

use std::sync::Arc;

use archive_search::backend::{BackendError, TransportError};
use archive_search::params::{normalize, RawParams};
use archive_search::query::{compile, SearchTarget};
use archive_search::service::{self, ApiError};
use common::{app, comments_url, executor, submissions_url, RecordingTransport, PRIMARY, SECONDARY};
use serde_json::json;

fn document(pairs: &[(&str, &str)], target: SearchTarget) -> archive_search::query::QueryDocument {
    let raw = RawParams::from_pairs(pairs.iter().copied());
    compile(&normalize(&raw, common::NOW).params, target)
}

// =============================================================================
// Executor
// =============================================================================

#[test]
fn test_primary_success_never_touches_secondary() {
    let transport = Arc::new(RecordingTransport::default().respond(&comments_url(PRIMARY), json!({})));
    let exec = executor(transport.clone());

    exec.execute(SearchTarget::Comments, &document(&[], SearchTarget::Comments))
        .unwrap();

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].0, comments_url(PRIMARY));
}

#[test]
fn test_connection_error_retransmits_identical_body() {
    let transport = Arc::new(
        RecordingTransport::default()
            .fail(
                &submissions_url(PRIMARY),
                TransportError::Connect {
                    url: submissions_url(PRIMARY),
                    message: "refused".to_string(),
                },
            )
            .respond(&submissions_url(SECONDARY), json!({"hits": {"hits": []}})),
    );
    let exec = executor(transport.clone());
    let doc = document(&[("title", "rust"), ("aggs", "domain")], SearchTarget::Submissions);

    exec.execute(SearchTarget::Submissions, &doc).unwrap();

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].0, submissions_url(PRIMARY));
    assert_eq!(requests[1].0, submissions_url(SECONDARY));
    assert_eq!(requests[0].1, requests[1].1);
}

#[test]
fn test_both_failures_are_reported() {
    let transport = Arc::new(
        RecordingTransport::default()
            .fail(
                &comments_url(PRIMARY),
                TransportError::Timeout {
                    url: comments_url(PRIMARY),
                },
            )
            .fail(
                &comments_url(SECONDARY),
                TransportError::Status {
                    url: comments_url(SECONDARY),
                    status: 502,
                },
            ),
    );
    let exec = executor(transport.clone());

    let err = exec
        .execute(SearchTarget::Comments, &document(&[], SearchTarget::Comments))
        .unwrap_err();

    match err {
        BackendError::Unavailable { primary, secondary } => {
            assert!(matches!(primary, TransportError::Timeout { .. }));
            assert!(matches!(secondary, TransportError::Status { status: 502, .. }));
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(transport.requests().len(), 2);
}

#[test]
fn test_malformed_response_does_not_fail_over() {
    let transport = Arc::new(RecordingTransport::default().respond(&comments_url(PRIMARY), json!("not a search response")));
    let exec = executor(transport.clone());

    let err = exec
        .execute(SearchTarget::Comments, &document(&[], SearchTarget::Comments))
        .unwrap_err();

    assert!(matches!(err, BackendError::MalformedResponse(_)));
    assert_eq!(transport.requests().len(), 1);
}

// =============================================================================
// Service
// =============================================================================

#[test]
fn test_search_surfaces_backend_unavailable() {
    let transport = Arc::new(RecordingTransport::default());
    let (_dir, ctx) = app(transport.clone(), &[]);

    let raw = RawParams::from_pairs([("q", "anything")]);
    let err = service::search_comments(&ctx, &raw).unwrap_err();

    assert!(matches!(err, ApiError::BackendUnavailable(_)));
    assert_eq!(err.kind(), "BackendUnavailable");
    assert_eq!(transport.requests().len(), 2);
}
