//! # Query Document
//!
//! Typed form of a backend query: a conjunction of filter predicates, an
//! optional list of negated clauses, one sort key, a size bound and named
//! aggregations.

use serde_json::{json, Map, Value};

use crate::params::{Frequency, SortDirection};

/// Exclusive numeric bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeBound {
    Gt(i64),
    Lt(i64),
}

/// A single filter clause
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Exact match on one value
    Term { field: String, value: Value },
    /// Exact match on any of several values
    Terms { field: String, values: Vec<Value> },
    Range { field: String, bound: RangeBound },
    /// Free text; terms are ANDed. Empty `fields` searches all fields.
    SimpleQueryString { query: String, fields: Vec<String> },
}

impl Predicate {
    pub fn term(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::Term {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn terms<V: Into<Value>>(field: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Predicate::Terms {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn gt(field: impl Into<String>, bound: i64) -> Self {
        Predicate::Range {
            field: field.into(),
            bound: RangeBound::Gt(bound),
        }
    }

    pub fn lt(field: impl Into<String>, bound: i64) -> Self {
        Predicate::Range {
            field: field.into(),
            bound: RangeBound::Lt(bound),
        }
    }

    pub fn text(query: impl Into<String>, field: Option<&str>) -> Self {
        Predicate::SimpleQueryString {
            query: query.into(),
            fields: field.map(|f| vec![f.to_string()]).unwrap_or_default(),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Predicate::Term { field, value } => json!({ "term": { field.as_str(): value } }),
            Predicate::Terms { field, values } => json!({ "terms": { field.as_str(): values } }),
            Predicate::Range { field, bound } => {
                let (op, value) = match bound {
                    RangeBound::Gt(v) => ("gt", v),
                    RangeBound::Lt(v) => ("lt", v),
                };
                json!({ "range": { field.as_str(): { op: value } } })
            }
            Predicate::SimpleQueryString { query, fields } => {
                let mut body = Map::new();
                body.insert("query".to_string(), json!(query));
                if !fields.is_empty() {
                    body.insert("fields".to_string(), json!(fields));
                }
                body.insert("default_operator".to_string(), json!("and"));
                json!({ "simple_query_string": body })
            }
        }
    }
}

/// One aggregation request
#[derive(Debug, Clone, PartialEq)]
pub enum AggregationSpec {
    /// Buckets ordered by document count, descending
    Terms {
        field: String,
        size: usize,
        min_doc_count: u64,
    },
    /// Buckets scored against background frequency. With
    /// `subset_frequency_score` the score is the foreground frequency only.
    SignificantTerms {
        field: String,
        size: usize,
        min_doc_count: u64,
        subset_frequency_score: bool,
    },
    /// Time buckets ordered by key, ascending
    DateHistogram {
        field: String,
        interval: Frequency,
        min_doc_count: u64,
    },
}

impl AggregationSpec {
    pub fn to_json(&self) -> Value {
        match self {
            AggregationSpec::Terms {
                field,
                size,
                min_doc_count,
            } => json!({
                "terms": {
                    "field": field,
                    "size": size,
                    "min_doc_count": min_doc_count,
                    "order": { "_count": "desc" },
                }
            }),
            AggregationSpec::SignificantTerms {
                field,
                size,
                min_doc_count,
                subset_frequency_score,
            } => {
                let mut body = Map::new();
                body.insert("field".to_string(), json!(field));
                body.insert("size".to_string(), json!(size));
                body.insert("min_doc_count".to_string(), json!(min_doc_count));
                if *subset_frequency_score {
                    body.insert(
                        "script_heuristic".to_string(),
                        json!({ "script": { "lang": "painless", "source": "params._subset_freq" } }),
                    );
                }
                json!({ "significant_terms": body })
            }
            AggregationSpec::DateHistogram {
                field,
                interval,
                min_doc_count,
            } => json!({
                "date_histogram": {
                    "field": field,
                    "interval": interval.as_str(),
                    "min_doc_count": min_doc_count,
                    "order": { "_key": "asc" },
                }
            }),
        }
    }
}

/// Sort key and direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

/// A complete backend query
#[derive(Debug, Clone, PartialEq)]
pub struct QueryDocument {
    pub filter: Vec<Predicate>,
    pub must_not: Vec<Predicate>,
    pub sort: Option<SortSpec>,
    pub size: usize,
    pub aggs: Vec<(String, AggregationSpec)>,
}

impl QueryDocument {
    pub fn builder(size: usize) -> QueryBuilder {
        QueryBuilder::new(size)
    }

    pub fn aggregation(&self, name: &str) -> Option<&AggregationSpec> {
        self.aggs.iter().find(|(n, _)| n == name).map(|(_, spec)| spec)
    }

    /// Render in the backend's JSON query DSL
    pub fn to_json(&self) -> Value {
        let mut bool_query = Map::new();
        bool_query.insert(
            "filter".to_string(),
            Value::Array(self.filter.iter().map(Predicate::to_json).collect()),
        );
        if !self.must_not.is_empty() {
            bool_query.insert(
                "must_not".to_string(),
                Value::Array(self.must_not.iter().map(Predicate::to_json).collect()),
            );
        }

        let mut doc = Map::new();
        doc.insert("query".to_string(), json!({ "bool": bool_query }));
        doc.insert("size".to_string(), json!(self.size));
        if let Some(sort) = &self.sort {
            doc.insert(
                "sort".to_string(),
                json!({ sort.field.as_str(): sort.direction.as_str() }),
            );
        }
        if !self.aggs.is_empty() {
            let aggs: Map<String, Value> = self
                .aggs
                .iter()
                .map(|(name, spec)| (name.clone(), spec.to_json()))
                .collect();
            doc.insert("aggs".to_string(), Value::Object(aggs));
        }

        Value::Object(doc)
    }

    /// Serialized request body
    pub fn to_body(&self) -> String {
        self.to_json().to_string()
    }
}

/// Appends clauses to fixed-shape lists
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    doc: QueryDocument,
}

impl QueryBuilder {
    pub fn new(size: usize) -> Self {
        Self {
            doc: QueryDocument {
                filter: Vec::new(),
                must_not: Vec::new(),
                sort: None,
                size,
                aggs: Vec::new(),
            },
        }
    }

    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.doc.filter.push(predicate);
        self
    }

    pub fn must_not(mut self, predicate: Predicate) -> Self {
        self.doc.must_not.push(predicate);
        self
    }

    pub fn sort(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.doc.sort = Some(SortSpec {
            field: field.into(),
            direction,
        });
        self
    }

    /// Add a named aggregation. A later spec with the same name replaces the
    /// earlier one.
    pub fn aggregation(mut self, name: impl Into<String>, spec: AggregationSpec) -> Self {
        let name = name.into();
        self.doc.aggs.retain(|(n, _)| *n != name);
        self.doc.aggs.push((name, spec));
        self
    }

    pub fn build(self) -> QueryDocument {
        self.doc
    }
}
