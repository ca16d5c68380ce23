//! # Query Compiler
//!
//! Pure translation from [`CanonicalParams`] to a [`QueryDocument`].

use crate::params::{
    AggregationKind, CanonicalParams, Frequency, NumericFilter, SortDirection, TextField,
    MAX_SIZE,
};

use super::document::{AggregationSpec, Predicate, QueryBuilder, QueryDocument};
use super::target::SearchTarget;

/// Bucket cap for terms and significant-terms aggregations
pub const TERMS_BUCKET_CAP: usize = 1000;

/// Bucket cap for the `link_id` aggregation
pub const LINK_ID_BUCKET_CAP: usize = 250;

/// Bucket cap for `time_of_day` (one bucket per hour, with headroom)
pub const TIME_OF_DAY_BUCKET_CAP: usize = 25;

/// Bucket cap for the `link_id` aggregation in user activity
pub const USER_LINK_ID_BUCKET_CAP: usize = 25;

/// Canonical time field
pub const TIME_FIELD: &str = "created_utc";

/// Field comment free text searches
const COMMENT_TEXT_FIELD: &str = "body";

/// Compile search parameters for `target`.
pub fn compile(params: &CanonicalParams, target: SearchTarget) -> QueryDocument {
    let mut builder = QueryDocument::builder(params.size.clamp(1, MAX_SIZE))
        .sort(params.sort_type.clone(), params.sort);

    if !params.subreddit.is_empty() {
        builder = builder.filter(Predicate::terms("subreddit", params.subreddit.iter().cloned()));
    }
    if !params.author.is_empty() {
        builder = builder.filter(Predicate::terms("author", params.author.iter().cloned()));
    }

    if let Some(after) = params.after {
        builder = builder.filter(Predicate::gt(TIME_FIELD, after));
    }
    if let Some(before) = params.before {
        builder = builder.filter(Predicate::lt(TIME_FIELD, before));
    }

    if let Some(score) = params.score {
        builder = builder.filter(numeric_predicate("score", score));
    }
    if let Some(num_comments) = params.num_comments {
        builder = builder.filter(numeric_predicate("num_comments", num_comments));
    }

    for (flag, value) in &params.flags {
        builder = builder.filter(Predicate::term(flag.field(), *value));
    }

    builder = add_text_predicates(builder, params, target);

    for kind in &params.aggs {
        if let Some(spec) = aggregation_spec(*kind, params, target) {
            builder = builder.aggregation(kind.name(), spec);
        }
    }

    builder.build()
}

fn numeric_predicate(field: &str, filter: NumericFilter) -> Predicate {
    match filter {
        NumericFilter::Lt(n) => Predicate::lt(field, n),
        NumericFilter::Gt(n) => Predicate::gt(field, n),
        NumericFilter::Eq(n) => Predicate::term(field, n),
    }
}

fn add_text_predicates(
    mut builder: QueryBuilder,
    params: &CanonicalParams,
    target: SearchTarget,
) -> QueryBuilder {
    for text in &params.text {
        let field = match (target, text.field) {
            (SearchTarget::Comments, TextField::Default) if !text.negated => Some(COMMENT_TEXT_FIELD),
            // Title, selftext and negation only exist for submissions
            (SearchTarget::Comments, _) => continue,
            (SearchTarget::Submissions, TextField::Default) => None,
            (SearchTarget::Submissions, TextField::Title) => Some("title"),
            (SearchTarget::Submissions, TextField::Selftext) => Some("selftext"),
        };

        let predicate = Predicate::text(text.query.clone(), field);
        builder = if text.negated {
            builder.must_not(predicate)
        } else {
            builder.filter(predicate)
        };
    }
    builder
}

/// The spec for one requested aggregation, or `None` if `target` does not
/// support it.
fn aggregation_spec(
    kind: AggregationKind,
    params: &CanonicalParams,
    target: SearchTarget,
) -> Option<AggregationSpec> {
    let min_doc_count = params.min_doc_count;

    let spec = match kind {
        AggregationKind::Subreddit => AggregationSpec::SignificantTerms {
            field: "subreddit.keyword".to_string(),
            size: TERMS_BUCKET_CAP,
            min_doc_count,
            subset_frequency_score: true,
        },
        AggregationKind::Author => AggregationSpec::Terms {
            field: "author.keyword".to_string(),
            size: TERMS_BUCKET_CAP,
            min_doc_count,
        },
        AggregationKind::CreatedUtc => AggregationSpec::DateHistogram {
            field: TIME_FIELD.to_string(),
            interval: params.frequency.unwrap_or(Frequency::Day),
            min_doc_count,
        },
        AggregationKind::LinkId => AggregationSpec::Terms {
            field: "link_id".to_string(),
            size: LINK_ID_BUCKET_CAP,
            min_doc_count,
        },
        AggregationKind::Domain if target == SearchTarget::Submissions => AggregationSpec::Terms {
            field: "domain.keyword".to_string(),
            size: TERMS_BUCKET_CAP,
            min_doc_count,
        },
        AggregationKind::TimeOfDay if target == SearchTarget::Submissions => {
            AggregationSpec::SignificantTerms {
                field: "hour".to_string(),
                size: TIME_OF_DAY_BUCKET_CAP,
                min_doc_count,
                subset_frequency_score: false,
            }
        }
        AggregationKind::Domain | AggregationKind::TimeOfDay => return None,
    };

    Some(spec)
}

/// Query fetching records by integer id
pub fn compile_id_lookup(ids: &[u64]) -> QueryDocument {
    QueryDocument::builder(ids.len().clamp(1, MAX_SIZE))
        .filter(Predicate::terms("id", ids.iter().copied()))
        .build()
}

/// Fixed activity profile of one author
pub fn compile_user_activity(author: &str) -> QueryDocument {
    QueryDocument::builder(MAX_SIZE)
        .filter(Predicate::terms("author", [author.to_lowercase()]))
        .sort(TIME_FIELD, SortDirection::Desc)
        .aggregation(
            AggregationKind::CreatedUtc.name(),
            AggregationSpec::DateHistogram {
                field: TIME_FIELD.to_string(),
                interval: Frequency::Day,
                min_doc_count: 0,
            },
        )
        .aggregation(
            AggregationKind::Subreddit.name(),
            AggregationSpec::Terms {
                field: "subreddit.keyword".to_string(),
                size: TERMS_BUCKET_CAP,
                min_doc_count: 0,
            },
        )
        .aggregation(
            AggregationKind::LinkId.name(),
            AggregationSpec::Terms {
                field: "link_id".to_string(),
                size: USER_LINK_ID_BUCKET_CAP,
                min_doc_count: 0,
            },
        )
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{normalize, RawParams};
    use crate::query::{RangeBound, SortSpec};
    use serde_json::json;

    const NOW: i64 = 1_700_000_000;

    fn compile_pairs(pairs: &[(&str, &str)], target: SearchTarget) -> QueryDocument {
        let normalized = normalize(&RawParams::from_pairs(pairs.iter().copied()), NOW);
        compile(&normalized.params, target)
    }

    #[test]
    fn test_basic_search() {
        let doc = compile_pairs(
            &[("subreddit", "Python"), ("size", "10"), ("sort", "asc")],
            SearchTarget::Comments,
        );
        assert_eq!(doc.filter, vec![Predicate::terms("subreddit", ["python"])]);
        assert_eq!(doc.size, 10);
        assert_eq!(
            doc.sort,
            Some(SortSpec {
                field: "created_utc".to_string(),
                direction: SortDirection::Asc,
            })
        );
        assert!(doc.must_not.is_empty());
        assert!(doc.aggs.is_empty());
    }

    #[test]
    fn test_time_window() {
        let doc = compile_pairs(&[("after", "1d"), ("before", "100")], SearchTarget::Comments);
        assert_eq!(
            doc.filter,
            vec![
                Predicate::Range {
                    field: "created_utc".to_string(),
                    bound: RangeBound::Gt(NOW - 86_400),
                },
                Predicate::lt("created_utc", 100),
            ]
        );
    }

    #[test]
    fn test_numeric_filters() {
        let doc = compile_pairs(
            &[("score", ">10"), ("num_comments", "3")],
            SearchTarget::Submissions,
        );
        assert_eq!(
            doc.filter,
            vec![Predicate::gt("score", 10), Predicate::term("num_comments", 3i64)]
        );
    }

    #[test]
    fn test_boolean_flags() {
        for flag in crate::params::BoolFlag::ALL {
            let field = flag.field();
            for value in ["true", "TRUE", "1"] {
                let doc = compile_pairs(&[(field, value)], SearchTarget::Submissions);
                assert_eq!(doc.filter, vec![Predicate::term(field, true)], "{field}={value}");
            }
            for value in ["false", "FALSE", "0"] {
                let doc = compile_pairs(&[(field, value)], SearchTarget::Submissions);
                assert_eq!(doc.filter, vec![Predicate::term(field, false)], "{field}={value}");
            }
            for value in ["yes", "2", "nope"] {
                let doc = compile_pairs(&[(field, value)], SearchTarget::Submissions);
                assert!(doc.filter.is_empty(), "{field}={value}");
            }
        }
    }

    #[test]
    fn test_comment_text_targets_body() {
        let doc = compile_pairs(
            &[("q", "borrow checker"), ("title", "ignored"), ("q:not", "ignored")],
            SearchTarget::Comments,
        );
        assert_eq!(doc.filter, vec![Predicate::text("borrow checker", Some("body"))]);
        assert!(doc.must_not.is_empty());
    }

    #[test]
    fn test_submission_text_and_negation() {
        let doc = compile_pairs(
            &[
                ("q", "rust"),
                ("title", "release"),
                ("selftext:not", "beta"),
                ("q:not", "go"),
            ],
            SearchTarget::Submissions,
        );
        assert_eq!(
            doc.filter,
            vec![Predicate::text("rust", None), Predicate::text("release", Some("title"))]
        );
        assert_eq!(
            doc.must_not,
            vec![Predicate::text("go", None), Predicate::text("beta", Some("selftext"))]
        );
    }

    #[test]
    fn test_aggregation_specs() {
        let doc = compile_pairs(
            &[
                ("aggs", "subreddit,author,created_utc,link_id,domain,time_of_day"),
                ("min_doc_count", "4"),
            ],
            SearchTarget::Submissions,
        );
        assert_eq!(doc.aggs.len(), 6);
        let json = doc.to_json();
        assert_eq!(json["aggs"]["subreddit"]["significant_terms"]["size"], 1000);
        assert_eq!(json["aggs"]["subreddit"]["significant_terms"]["min_doc_count"], 4);
        assert_eq!(json["aggs"]["author"]["terms"]["size"], 1000);
        assert_eq!(json["aggs"]["link_id"]["terms"]["size"], 250);
        assert_eq!(json["aggs"]["domain"]["terms"]["field"], "domain.keyword");
        assert_eq!(json["aggs"]["time_of_day"]["significant_terms"]["size"], 25);
        assert_eq!(
            json["aggs"]["created_utc"]["date_histogram"],
            json!({
                "field": "created_utc",
                "interval": "day",
                "min_doc_count": 4,
                "order": { "_key": "asc" },
            })
        );
    }

    #[test]
    fn test_submission_only_aggregations_skipped_for_comments() {
        let doc = compile_pairs(&[("aggs", "domain,time_of_day,author")], SearchTarget::Comments);
        let names: Vec<&str> = doc.aggs.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["author"]);
    }

    #[test]
    fn test_histogram_frequency() {
        let doc = compile_pairs(
            &[("aggs", "created_utc"), ("frequency", "week")],
            SearchTarget::Comments,
        );
        assert_eq!(
            doc.aggregation("created_utc"),
            Some(&AggregationSpec::DateHistogram {
                field: "created_utc".to_string(),
                interval: Frequency::Week,
                min_doc_count: 0,
            })
        );
    }

    #[test]
    fn test_compile_is_deterministic() {
        let pairs = [("author", "x"), ("aggs", "author,subreddit"), ("q", "hi")];
        assert_eq!(
            compile_pairs(&pairs, SearchTarget::Comments).to_body(),
            compile_pairs(&pairs, SearchTarget::Comments).to_body()
        );
    }

    #[test]
    fn test_id_lookup() {
        let doc = compile_id_lookup(&[10, 36]);
        assert_eq!(doc.filter, vec![Predicate::terms("id", [10u64, 36])]);
        assert_eq!(doc.size, 2);
        assert!(doc.sort.is_none());
    }

    #[test]
    fn test_user_activity_shape() {
        let doc = compile_user_activity("SomeUser");
        assert_eq!(doc.filter, vec![Predicate::terms("author", ["someuser"])]);
        assert_eq!(doc.size, 500);
        let names: Vec<&str> = doc.aggs.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["created_utc", "subreddit", "link_id"]);
    }
}
