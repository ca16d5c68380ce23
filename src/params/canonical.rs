//! # Canonical Parameters
//!
//! The validated, defaulted parameter set every downstream stage consumes.

use std::collections::BTreeSet;

use serde::Serialize;

/// Smallest result size a query may request
pub const MIN_SIZE: usize = 1;

/// Largest result size a query may request
pub const MAX_SIZE: usize = 500;

/// Result size when none (or garbage) is given
pub const DEFAULT_SIZE: usize = 25;

/// Sort field when none is given
pub const DEFAULT_SORT_TYPE: &str = "created_utc";

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }
}

/// Comparison parsed from `<N`, `>N` or `N`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericFilter {
    Lt(i64),
    Gt(i64),
    Eq(i64),
}

/// The boolean record flags callers may filter on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BoolFlag {
    Over18,
    IsVideo,
    Stickied,
    Spoiler,
    Locked,
    ContestMode,
}

impl BoolFlag {
    pub const ALL: [BoolFlag; 6] = [
        BoolFlag::Over18,
        BoolFlag::IsVideo,
        BoolFlag::Stickied,
        BoolFlag::Spoiler,
        BoolFlag::Locked,
        BoolFlag::ContestMode,
    ];

    /// Parameter name, which is also the backend field name
    pub fn field(&self) -> &'static str {
        match self {
            BoolFlag::Over18 => "over_18",
            BoolFlag::IsVideo => "is_video",
            BoolFlag::Stickied => "stickied",
            BoolFlag::Spoiler => "spoiler",
            BoolFlag::Locked => "locked",
            BoolFlag::ContestMode => "contest_mode",
        }
    }
}

/// Histogram bucket interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Frequency {
    Second,
    Minute,
    Hour,
    #[default]
    Day,
    Week,
    Month,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Second => "second",
            Frequency::Minute => "minute",
            Frequency::Hour => "hour",
            Frequency::Day => "day",
            Frequency::Week => "week",
            Frequency::Month => "month",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "second" => Some(Frequency::Second),
            "minute" => Some(Frequency::Minute),
            "hour" => Some(Frequency::Hour),
            "day" => Some(Frequency::Day),
            "week" => Some(Frequency::Week),
            "month" => Some(Frequency::Month),
            _ => None,
        }
    }
}

/// Aggregations a caller can request by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregationKind {
    Subreddit,
    Author,
    CreatedUtc,
    LinkId,
    Domain,
    TimeOfDay,
}

impl AggregationKind {
    /// Name used both in the request and as the aggregation key
    pub fn name(&self) -> &'static str {
        match self {
            AggregationKind::Subreddit => "subreddit",
            AggregationKind::Author => "author",
            AggregationKind::CreatedUtc => "created_utc",
            AggregationKind::LinkId => "link_id",
            AggregationKind::Domain => "domain",
            AggregationKind::TimeOfDay => "time_of_day",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "subreddit" => Some(AggregationKind::Subreddit),
            "author" => Some(AggregationKind::Author),
            "created_utc" => Some(AggregationKind::CreatedUtc),
            "link_id" => Some(AggregationKind::LinkId),
            "domain" => Some(AggregationKind::Domain),
            "time_of_day" => Some(AggregationKind::TimeOfDay),
            _ => None,
        }
    }
}

/// Which field a free-text parameter targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    /// `q`: the comment body for comments, unrestricted for submissions
    Default,
    Title,
    Selftext,
}

/// One free-text parameter (`q`, `title`, `selftext` or a `:not` variant)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextQuery {
    pub field: TextField,
    pub query: String,
    pub negated: bool,
}

/// Fully validated request parameters
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalParams {
    /// Case-folded subreddit names
    pub subreddit: Vec<String>,
    /// Case-folded author names
    pub author: Vec<String>,
    pub score: Option<NumericFilter>,
    pub num_comments: Option<NumericFilter>,
    /// Lower time bound (exclusive), epoch seconds
    pub after: Option<i64>,
    /// Upper time bound (exclusive), epoch seconds
    pub before: Option<i64>,
    pub flags: Vec<(BoolFlag, bool)>,
    pub text: Vec<TextQuery>,
    pub sort_type: String,
    pub sort: SortDirection,
    /// Always within `[MIN_SIZE, MAX_SIZE]`
    pub size: usize,
    pub aggs: Vec<AggregationKind>,
    pub frequency: Option<Frequency>,
    pub min_doc_count: u64,
    /// Case-folded projection allow-list
    pub fields: Option<BTreeSet<String>>,
    /// Identifiers exactly as given (case-folded), prefixes intact
    pub ids: Vec<String>,
}

impl Default for CanonicalParams {
    fn default() -> Self {
        Self {
            subreddit: Vec::new(),
            author: Vec::new(),
            score: None,
            num_comments: None,
            after: None,
            before: None,
            flags: Vec::new(),
            text: Vec::new(),
            sort_type: DEFAULT_SORT_TYPE.to_string(),
            sort: SortDirection::Desc,
            size: DEFAULT_SIZE,
            aggs: Vec::new(),
            frequency: None,
            min_doc_count: 0,
            fields: None,
            ids: Vec::new(),
        }
    }
}

impl CanonicalParams {
    pub fn wants_aggregation(&self, kind: AggregationKind) -> bool {
        self.aggs.contains(&kind)
    }

    /// Whether the request is a by-ID lookup rather than a search
    pub fn is_id_lookup(&self) -> bool {
        !self.ids.is_empty()
    }
}
