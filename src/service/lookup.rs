//! # Lookup Operations
//!
//! Fixed-shape queries keyed by a path parameter.

use std::time::Instant;

use crate::ids::{decode_fullname, encode_unsigned, IdPrefix};
use crate::query::{compile_user_activity, SearchTarget};
use crate::relational::comment_ids_for_submission;
use crate::response::{normalize_hit, process_user_activity, Envelope, Metadata, Record, RecordKind};

use super::context::AppContext;
use super::errors::{ApiError, ApiResult};

/// Recent comments of `author` plus their activity profile.
pub fn user_activity(ctx: &AppContext, author: &str) -> ApiResult<Envelope<Vec<Record>>> {
    let started = Instant::now();
    let author = author.trim();
    if author.is_empty() {
        return Err(ApiError::InvalidArgument("author must not be empty".to_string()));
    }

    let response = ctx
        .executor()
        .execute(SearchTarget::Comments, &compile_user_activity(author))?;

    let records = response
        .hits
        .hits
        .into_iter()
        .map(|hit| normalize_hit(hit, RecordKind::Comment, None))
        .collect();
    let aggs = process_user_activity(response.aggregations);

    Ok(Envelope::new(records, Metadata::new(started.elapsed())).with_aggs(aggs))
}

/// Encoded ids of every comment under a submission, ascending.
pub fn comment_ids(ctx: &AppContext, submission: &str) -> ApiResult<Envelope<Vec<String>>> {
    let started = Instant::now();
    let submission_id = decode_fullname(submission, IdPrefix::Submission)?;

    let ids = comment_ids_for_submission(ctx.store(), submission_id)?
        .into_iter()
        .map(encode_unsigned)
        .collect::<Vec<_>>();

    tracing::debug!(submission = submission_id, count = ids.len(), "child ids resolved");
    Ok(Envelope::new(ids, Metadata::new(started.elapsed())))
}
