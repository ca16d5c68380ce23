//! # Aggregation Post-Processor
//!
//! Reshapes raw aggregation buckets into their public form, per aggregation
//! kind. Everything here is pure; submission enrichment of `link_id` buckets
//! takes already-fetched records.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use serde_json::Value;

use crate::ids::{encode_unsigned, with_prefix, IdPrefix};
use crate::params::AggregationKind;
use crate::query::SearchTarget;

use super::raw::{RawAggregation, RawBucket};
use super::records::{integer_id, Record};

/// Substring marking self-post domains
const SELF_POST_DOMAIN: &str = "self.";

/// A terms or significant-terms bucket
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermBucket {
    pub key: Value,
    pub doc_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// Resolved submission, for `link_id` buckets of comment searches
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// A date histogram bucket keyed by epoch second
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBucket {
    pub key: i64,
    pub doc_count: u64,
}

/// An hour-of-day bucket with foreground/background share
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourBucket {
    pub utc_hour: Value,
    pub doc_count: u64,
    pub bg_count: u64,
    pub doc_percentage: f64,
    pub bg_percentage: f64,
    pub deviation_percentage: f64,
}

/// One processed aggregation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AggregationResult {
    Terms(Vec<TermBucket>),
    Histogram(Vec<HistogramBucket>),
    TimeOfDay(Vec<HourBucket>),
}

/// Processed aggregations by name
pub type Aggregations = BTreeMap<String, AggregationResult>;

/// Process the aggregations of a comment or submission search.
pub fn process_aggregations(
    raw: BTreeMap<String, RawAggregation>,
    target: SearchTarget,
) -> Aggregations {
    let mut out = Aggregations::new();

    for (name, aggregation) in raw {
        let Some(kind) = AggregationKind::parse(&name) else {
            continue;
        };

        let result = match kind {
            AggregationKind::Subreddit => AggregationResult::Terms(scored_by_frequency(aggregation.buckets)),
            AggregationKind::Author | AggregationKind::LinkId => {
                AggregationResult::Terms(aggregation.buckets.into_iter().map(rescored).collect())
            }
            AggregationKind::CreatedUtc => AggregationResult::Histogram(histogram(aggregation.buckets)),
            AggregationKind::Domain if target == SearchTarget::Submissions => {
                AggregationResult::Terms(without_self_posts(aggregation.buckets))
            }
            AggregationKind::TimeOfDay if target == SearchTarget::Submissions => {
                AggregationResult::TimeOfDay(time_of_day(aggregation))
            }
            AggregationKind::Domain | AggregationKind::TimeOfDay => continue,
        };

        out.insert(name, result);
    }

    out
}

/// Process the fixed aggregations of a user activity query: histogram keys in
/// seconds, subreddit counts as-is, submission keys as fullnames.
pub fn process_user_activity(raw: BTreeMap<String, RawAggregation>) -> Aggregations {
    let mut out = Aggregations::new();

    for (name, aggregation) in raw {
        let result = match AggregationKind::parse(&name) {
            Some(AggregationKind::CreatedUtc) => AggregationResult::Histogram(histogram(aggregation.buckets)),
            Some(AggregationKind::Subreddit) => {
                AggregationResult::Terms(aggregation.buckets.into_iter().map(term_bucket).collect())
            }
            Some(AggregationKind::LinkId) => AggregationResult::Terms(
                aggregation
                    .buckets
                    .into_iter()
                    .map(|bucket| {
                        let mut out = term_bucket(bucket);
                        if let Some(id) = integer_id(&out.key) {
                            out.key = Value::String(with_prefix(&encode_unsigned(id), IdPrefix::Submission));
                        }
                        out
                    })
                    .collect(),
            ),
            _ => continue,
        };
        out.insert(name, result);
    }

    out
}

/// Attach resolved submissions to `link_id` buckets. Buckets whose submission
/// is unknown, or was created at or before `after`, are dropped.
pub fn attach_submissions(
    buckets: Vec<TermBucket>,
    submissions: &HashMap<u64, Record>,
    after: i64,
) -> Vec<TermBucket> {
    buckets
        .into_iter()
        .filter_map(|mut bucket| {
            let submission = integer_id(&bucket.key).and_then(|id| submissions.get(&id))?;
            let created = submission.get("created_utc").and_then(Value::as_f64)?;
            if created <= after as f64 {
                return None;
            }
            bucket.data = Some(submission.clone().into_value());
            Some(bucket)
        })
        .collect()
}

/// Integer submission ids referenced by `link_id` buckets
pub fn link_ids(buckets: &[TermBucket]) -> Vec<u64> {
    buckets.iter().filter_map(|b| integer_id(&b.key)).collect()
}

/// `doc_count / bg_count`, zero when there is no background
pub fn frequency_score(doc_count: u64, bg_count: Option<u64>) -> f64 {
    match bg_count {
        Some(bg) if bg > 0 => doc_count as f64 / bg as f64,
        _ => 0.0,
    }
}

fn term_bucket(bucket: RawBucket) -> TermBucket {
    TermBucket {
        key: bucket.key,
        doc_count: bucket.doc_count,
        bg_count: bucket.bg_count,
        score: bucket.score,
        data: None,
    }
}

/// Recompute an existing score as foreground/background frequency
fn rescored(bucket: RawBucket) -> TermBucket {
    let mut out = term_bucket(bucket);
    if out.score.is_some() {
        out.score = Some(frequency_score(out.doc_count, out.bg_count));
    }
    out
}

/// Score every bucket and sort by score, descending
fn scored_by_frequency(buckets: Vec<RawBucket>) -> Vec<TermBucket> {
    let mut out: Vec<TermBucket> = buckets
        .into_iter()
        .map(|bucket| {
            let mut out = term_bucket(bucket);
            out.score = Some(frequency_score(out.doc_count, out.bg_count));
            out
        })
        .collect();

    out.sort_by(|a, b| b.score.unwrap_or(0.0).total_cmp(&a.score.unwrap_or(0.0)));
    out
}

/// Millisecond keys to seconds; the formatted key is dropped, as are buckets
/// without a numeric key
fn histogram(buckets: Vec<RawBucket>) -> Vec<HistogramBucket> {
    buckets
        .into_iter()
        .filter_map(|bucket| {
            let millis = bucket
                .key
                .as_i64()
                .or_else(|| bucket.key.as_f64().map(|f| f.trunc() as i64))?;
            Some(HistogramBucket {
                key: millis / 1000,
                doc_count: bucket.doc_count,
            })
        })
        .collect()
}

fn without_self_posts(buckets: Vec<RawBucket>) -> Vec<TermBucket> {
    buckets
        .into_iter()
        .filter(|bucket| {
            !bucket
                .key
                .as_str()
                .is_some_and(|domain| domain.contains(SELF_POST_DOMAIN))
        })
        .map(term_bucket)
        .collect()
}

fn time_of_day(aggregation: RawAggregation) -> Vec<HourBucket> {
    let total_docs = aggregation.doc_count.unwrap_or(0);
    let total_bg = aggregation.bg_count.unwrap_or(0);

    let mut out: Vec<HourBucket> = aggregation
        .buckets
        .into_iter()
        .map(|bucket| {
            let bg_count = bucket.bg_count.unwrap_or(0);
            let doc_percentage = round_to(percentage(bucket.doc_count, total_docs), 5);
            let bg_percentage = round_to(percentage(bg_count, total_bg), 5);
            HourBucket {
                utc_hour: bucket.key,
                doc_count: bucket.doc_count,
                bg_count,
                doc_percentage,
                bg_percentage,
                deviation_percentage: round_to(doc_percentage - bg_percentage, 4),
            }
        })
        .collect();

    out.sort_by(|a, b| compare_keys(&a.utc_hour, &b.utc_hour));
    out
}

fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 * 100.0 / total as f64
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Numeric keys compare numerically, anything else by its text
fn compare_keys(a: &Value, b: &Value) -> Ordering {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        _ => a.to_string().cmp(&b.to_string()),
    }
}
