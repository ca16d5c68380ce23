//! # Response Shaping
//!
//! Raw backend output in, public envelope out: record normalization,
//! aggregation post-processing and the envelope types.

pub mod aggregations;
pub mod envelope;
pub mod html;
pub mod raw;
pub mod records;

pub use aggregations::{
    attach_submissions, link_ids, process_aggregations, process_user_activity, AggregationResult,
    Aggregations, HistogramBucket, HourBucket, TermBucket,
};
pub use envelope::{Envelope, ErrorEnvelope, Metadata, SearchMetadata, API_VERSION};
pub use raw::{RawAggregation, RawBucket, RawHit, RawHits, RawSearchResponse};
pub use records::{normalize_document, normalize_hit, Record, RecordKind};
