//! # Search Targets

use serde::Serialize;

/// Which record collection a query runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchTarget {
    Comments,
    Submissions,
}

impl SearchTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchTarget::Comments => "comments",
            SearchTarget::Submissions => "submissions",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "comment" | "comments" => Some(SearchTarget::Comments),
            "submission" | "submissions" => Some(SearchTarget::Submissions),
            _ => None,
        }
    }
}
