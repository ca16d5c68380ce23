//! Search HTTP Routes
//!
//! Every handler parses its inputs, runs the service operation on the
//! blocking pool inside a request span, and renders the envelope with a
//! `Cache-Control` header.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::handler::Handler;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, MethodRouter};
use axum::{Json, Router};
use serde::Serialize;
use tracing::Instrument;
use uuid::Uuid;

use crate::params::RawParams;
use crate::service::{self, ApiError, ApiResult, AppContext};

/// Cache policy for search and lookup responses
pub const SEARCH_CACHE_CONTROL: &str = "public, max-age=2, s-maxage=2";

/// Cache policy for child-id listings
pub const CHILD_IDS_CACHE_CONTROL: &str = "public, max-age=5, s-maxage=5";

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

type Ctx = State<Arc<AppContext>>;
type Pairs = Result<Query<Vec<(String, String)>>, QueryRejection>;
type Segment = Result<Path<String>, PathRejection>;

/// Create the search routes
pub fn search_routes(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/reddit/search", get_only(comment_search_handler))
        .route("/reddit/comment/search", get_only(comment_search_handler))
        .route("/reddit/search/comment", get_only(comment_search_handler))
        .route("/reddit/search/submission", get_only(submission_search_handler))
        .route("/reddit/submission/search", get_only(submission_search_handler))
        .route("/reddit/analyze/user/:author", get_only(user_activity_handler))
        .route("/get/comment_ids/:id", get_only(comment_ids_handler))
        .route("/reddit/submission/comment_ids/:id", get_only(comment_ids_handler))
        .with_state(ctx)
}

/// Health check route
pub fn health_routes() -> Router {
    Router::new().route("/health", get_only(health_handler))
}

/// GET route whose other methods answer with the error envelope
fn get_only<H, T, S>(handler: H) -> MethodRouter<S>
where
    H: Handler<T, S>,
    T: 'static,
    S: Clone + Send + Sync + 'static,
{
    get(handler).fallback(method_not_allowed_handler)
}

async fn health_handler() -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (StatusCode::OK, Json(response))
}

async fn comment_search_handler(State(ctx): Ctx, pairs: Pairs) -> Result<Response, ApiError> {
    let raw = query_params(pairs)?;
    run_blocking("comment_search", SEARCH_CACHE_CONTROL, move || {
        service::search_comments(&ctx, &raw)
    })
    .await
}

async fn submission_search_handler(State(ctx): Ctx, pairs: Pairs) -> Result<Response, ApiError> {
    let raw = query_params(pairs)?;
    run_blocking("submission_search", SEARCH_CACHE_CONTROL, move || {
        service::search_submissions(&ctx, &raw)
    })
    .await
}

async fn user_activity_handler(State(ctx): Ctx, author: Segment) -> Result<Response, ApiError> {
    let author = path_segment(author)?;
    run_blocking("user_activity", SEARCH_CACHE_CONTROL, move || {
        service::user_activity(&ctx, &author)
    })
    .await
}

async fn comment_ids_handler(State(ctx): Ctx, id: Segment) -> Result<Response, ApiError> {
    let id = path_segment(id)?;
    run_blocking("comment_ids", CHILD_IDS_CACHE_CONTROL, move || {
        service::comment_ids(&ctx, &id)
    })
    .await
}

fn query_params(pairs: Pairs) -> ApiResult<RawParams> {
    let Query(pairs) = pairs.map_err(|rejection| ApiError::InvalidArgument(rejection.body_text()))?;
    Ok(RawParams::from_pairs(pairs))
}

fn path_segment(segment: Segment) -> ApiResult<String> {
    let Path(value) = segment.map_err(|rejection| ApiError::InvalidArgument(rejection.body_text()))?;
    Ok(value)
}

/// Unknown paths answer with the error envelope
pub async fn not_found_handler() -> ApiError {
    ApiError::NotFound("no such endpoint".to_string())
}

async fn method_not_allowed_handler() -> ApiError {
    ApiError::MethodNotAllowed("only GET is supported".to_string())
}

/// Run a blocking service operation under a fresh request span.
async fn run_blocking<T, F>(endpoint: &'static str, cache_control: &'static str, op: F) -> Result<Response, ApiError>
where
    F: FnOnce() -> ApiResult<T> + Send + 'static,
    T: Serialize + Send + 'static,
{
    let started = Instant::now();
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("request", %request_id, endpoint);
    let worker_span = span.clone();

    let outcome = tokio::task::spawn_blocking(move || worker_span.in_scope(op))
        .instrument(span.clone())
        .await
        .map_err(|err| ApiError::Internal(format!("worker task failed: {err}")))?;

    let envelope = match outcome {
        Ok(envelope) => envelope,
        Err(err) => {
            span.in_scope(|| {
                if err.status_code().is_server_error() {
                    tracing::error!(error = %err, kind = err.kind(), "request failed");
                } else {
                    tracing::warn!(error = %err, kind = err.kind(), "request rejected");
                }
            });
            return Err(err);
        }
    };

    span.in_scope(|| {
        tracing::info!(elapsed_ms = started.elapsed().as_millis() as u64, "request complete");
    });

    // Round-trip through Value so object keys come out sorted
    let body = serde_json::to_value(envelope).map_err(|err| ApiError::Internal(err.to_string()))?;
    Ok(([(header::CACHE_CONTROL, cache_control)], Json(body)).into_response())
}
