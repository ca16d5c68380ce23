//! # Search Operations
//!
//! Comment and submission search, including the by-ID path that bypasses
//! query compilation.

use std::collections::{BTreeSet, HashMap};
use std::time::Instant;

use crate::backend::BackendResult;
use crate::ids::{decode, strip_prefix, IdPrefix};
use crate::params::{normalize, CanonicalParams, Normalized, ParamIssue, RawParams};
use crate::query::{compile, compile_id_lookup, SearchTarget};
use crate::relational::{fetch_comments, ID_LOOKUP_LIMIT};
use crate::response::records::integer_id;
use crate::response::{
    attach_submissions, link_ids, normalize_document, normalize_hit, process_aggregations,
    AggregationResult, Envelope, Metadata, Record, RecordKind, SearchMetadata, TermBucket,
};

use super::context::AppContext;
use super::errors::{ApiError, ApiResult};

/// Search response body
pub type SearchEnvelope = Envelope<Vec<Record>>;

pub fn search_comments(ctx: &AppContext, raw: &RawParams) -> ApiResult<SearchEnvelope> {
    search(ctx, raw, SearchTarget::Comments)
}

pub fn search_submissions(ctx: &AppContext, raw: &RawParams) -> ApiResult<SearchEnvelope> {
    search(ctx, raw, SearchTarget::Submissions)
}

/// Normalize, compile, execute and shape one search.
pub fn search(ctx: &AppContext, raw: &RawParams, target: SearchTarget) -> ApiResult<SearchEnvelope> {
    let started = Instant::now();
    let Normalized { params, issues } = normalize(raw, ctx.now());
    log_issues(&issues);

    if params.is_id_lookup() {
        let records = lookup_by_ids(ctx, &params, target)?;
        return Ok(Envelope::new(records, Metadata::new(started.elapsed())));
    }

    let doc = compile(&params, target);
    let response = ctx.executor().execute(target, &doc)?;
    let search_meta = SearchMetadata::new(&params, &response);

    let kind = record_kind(target);
    let records: Vec<Record> = response
        .hits
        .hits
        .into_iter()
        .map(|hit| normalize_hit(hit, kind, params.fields.as_ref()))
        .collect();

    let mut aggs = process_aggregations(response.aggregations, target);
    if target == SearchTarget::Comments {
        if let Some(AggregationResult::Terms(buckets)) = aggs.remove("link_id") {
            let enriched = enrich_link_ids(ctx, buckets, params.after.unwrap_or(0))?;
            aggs.insert("link_id".to_string(), AggregationResult::Terms(enriched));
        }
    }

    tracing::debug!(
        target_index = target.as_str(),
        results = records.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "search complete"
    );

    let metadata = Metadata::new(started.elapsed()).with_search(search_meta);
    Ok(Envelope::new(records, metadata).with_aggs(aggs))
}

fn log_issues(issues: &[ParamIssue]) {
    for issue in issues {
        if issue.is_invalid() {
            tracing::warn!(key = %issue.key, value = %issue.value, "{}", issue);
        } else {
            tracing::debug!(key = %issue.key, "ignoring unrecognized parameter");
        }
    }
}

fn record_kind(target: SearchTarget) -> RecordKind {
    match target {
        SearchTarget::Comments => RecordKind::Comment,
        SearchTarget::Submissions => RecordKind::Submission,
    }
}

/// Decode caller ids, each optionally carrying the target's own prefix.
fn decode_ids(ids: &[String], prefix: IdPrefix) -> ApiResult<Vec<u64>> {
    if ids.len() > ID_LOOKUP_LIMIT {
        return Err(ApiError::InvalidArgument(format!(
            "at most {ID_LOOKUP_LIMIT} ids may be requested, got {}",
            ids.len()
        )));
    }
    let decoded = ids
        .iter()
        .map(|id| decode(strip_prefix(id, &[prefix])))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(decoded)
}

/// Comments come from the relational archive, submissions from the search
/// backend.
fn lookup_by_ids(ctx: &AppContext, params: &CanonicalParams, target: SearchTarget) -> ApiResult<Vec<Record>> {
    let kind = record_kind(target);
    let ids = decode_ids(&params.ids, kind.prefix())?;
    let projection = params.fields.as_ref();

    let records = match target {
        SearchTarget::Comments => fetch_comments(ctx.store(), &ids)?
            .into_iter()
            .map(|(id, doc)| normalize_document(doc, Some(id), kind, projection))
            .collect(),
        SearchTarget::Submissions => fetch_submissions(ctx, &ids, projection)?
            .into_iter()
            .map(|(_, record)| record)
            .collect(),
    };
    Ok(records)
}

/// Submissions by integer id, in backend order
pub(crate) fn fetch_submissions(
    ctx: &AppContext,
    ids: &[u64],
    projection: Option<&BTreeSet<String>>,
) -> BackendResult<Vec<(u64, Record)>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let response = ctx
        .executor()
        .execute(SearchTarget::Submissions, &compile_id_lookup(ids))?;

    Ok(response
        .hits
        .hits
        .into_iter()
        .filter_map(|hit| {
            let id = hit
                .numeric_id()
                .or_else(|| hit.source.get("id").and_then(integer_id))?;
            Some((id, normalize_hit(hit, RecordKind::Submission, projection)))
        })
        .collect())
}

/// Replace `link_id` bucket keys' bare counts with the submissions they
/// reference.
fn enrich_link_ids(ctx: &AppContext, buckets: Vec<TermBucket>, after: i64) -> ApiResult<Vec<TermBucket>> {
    let ids = link_ids(&buckets);
    let submissions: HashMap<u64, Record> = fetch_submissions(ctx, &ids, None)?.into_iter().collect();
    Ok(attach_submissions(buckets, &submissions, after))
}
