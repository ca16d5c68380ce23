//! # Parameter Normalizer
//!
//! One pass over the raw bag produces the canonical parameter set. Parsing
//! helpers return [`ParamResult`]; failures become [`ParamIssue`]s.

use std::collections::BTreeSet;
use std::num::IntErrorKind;

use super::canonical::{
    AggregationKind, BoolFlag, CanonicalParams, Frequency, NumericFilter, SortDirection,
    TextField, TextQuery, DEFAULT_SIZE, MAX_SIZE, MIN_SIZE,
};
use super::errors::{ParamError, ParamIssue, ParamResult};
use super::raw::RawParams;

/// Every key the normalizer understands
const KNOWN_KEYS: &[&str] = &[
    "subreddit",
    "author",
    "q",
    "q:not",
    "title",
    "title:not",
    "selftext",
    "selftext:not",
    "after",
    "before",
    "score",
    "num_comments",
    "over_18",
    "is_video",
    "stickied",
    "spoiler",
    "locked",
    "contest_mode",
    "sort",
    "sort_type",
    "order",
    "size",
    "limit",
    "aggs",
    "frequency",
    "min_doc_count",
    "fields",
    "ids",
];

/// Free-text keys in emission order
const TEXT_KEYS: &[(&str, TextField, bool)] = &[
    ("q", TextField::Default, false),
    ("title", TextField::Title, false),
    ("selftext", TextField::Selftext, false),
    ("q:not", TextField::Default, true),
    ("title:not", TextField::Title, true),
    ("selftext:not", TextField::Selftext, true),
];

/// Normalizer output
#[derive(Debug, Clone)]
pub struct Normalized {
    pub params: CanonicalParams,
    pub issues: Vec<ParamIssue>,
}

/// Normalize a raw parameter bag. `now` is the epoch second relative times
/// are resolved against.
pub fn normalize(raw: &RawParams, now: i64) -> Normalized {
    let mut params = CanonicalParams::default();
    let mut issues = Vec::new();

    for (key, value) in raw.iter() {
        if !KNOWN_KEYS.contains(&key) && !issues.iter().any(|i: &ParamIssue| i.key == key) {
            issues.push(ParamIssue::ignored(key, value));
        }
    }

    params.subreddit = folded_list(raw, "subreddit");
    params.author = folded_list(raw, "author");

    params.after = parse_into(raw, "after", &mut issues, |v| parse_time(v, now));
    params.before = parse_into(raw, "before", &mut issues, |v| parse_time(v, now));
    params.score = parse_into(raw, "score", &mut issues, parse_numeric_filter);
    params.num_comments = parse_into(raw, "num_comments", &mut issues, parse_numeric_filter);

    for flag in BoolFlag::ALL {
        if let Some(value) = parse_into(raw, flag.field(), &mut issues, parse_bool) {
            params.flags.push((flag, value));
        }
    }

    for (key, field, negated) in TEXT_KEYS {
        if let Some(query) = raw.last(key) {
            params.text.push(TextQuery {
                field: *field,
                query: query.to_string(),
                negated: *negated,
            });
        }
    }

    if let Some(sort_type) = raw.last("sort_type") {
        params.sort_type = sort_type.to_lowercase();
    }

    // `order` is an alias for `sort` and wins when both are given
    let direction_key = if raw.last("order").is_some() { "order" } else { "sort" };
    if let Some(direction) = parse_into(raw, direction_key, &mut issues, parse_direction) {
        params.sort = direction;
    }

    // `limit` is an alias for `size` and wins when both are given
    let size_key = if raw.last("limit").is_some() { "limit" } else { "size" };
    params.size = parse_into(raw, size_key, &mut issues, parse_size).unwrap_or(DEFAULT_SIZE);

    for name in raw.all("aggs") {
        match AggregationKind::parse(name) {
            Some(kind) if !params.aggs.contains(&kind) => params.aggs.push(kind),
            Some(_) => {}
            None => issues.push(ParamIssue::invalid(
                "aggs",
                name,
                ParamError::UnknownAggregation(name.to_string()),
            )),
        }
    }

    params.frequency = parse_into(raw, "frequency", &mut issues, parse_frequency);
    params.min_doc_count =
        parse_into(raw, "min_doc_count", &mut issues, parse_unsigned).unwrap_or(0);

    let fields: BTreeSet<String> = raw.all("fields").iter().map(|f| f.to_lowercase()).collect();
    if !fields.is_empty() {
        params.fields = Some(fields);
    }

    params.ids = folded_list(raw, "ids");

    Normalized { params, issues }
}

/// Parse the last value of `key`, recording an issue on failure
fn parse_into<T>(
    raw: &RawParams,
    key: &str,
    issues: &mut Vec<ParamIssue>,
    parse: impl Fn(&str) -> ParamResult<T>,
) -> Option<T> {
    let value = raw.last(key)?;
    match parse(value) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            issues.push(ParamIssue::invalid(key, value, err));
            None
        }
    }
}

fn folded_list(raw: &RawParams, key: &str) -> Vec<String> {
    raw.all(key).iter().map(|v| v.to_lowercase()).collect()
}

fn parse_unsigned(value: &str) -> ParamResult<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| ParamError::NotAnInteger(value.to_string()))
}

/// Parse an epoch integer or a relative `<integer><unit>` expression
pub fn parse_time(value: &str, now: i64) -> ParamResult<i64> {
    let value = value.trim();
    if let Ok(epoch) = value.parse::<i64>() {
        return Ok(epoch);
    }

    let invalid = || ParamError::InvalidTime(value.to_string());
    let unit = value.chars().last().ok_or_else(invalid)?;
    let amount: i64 = value[..value.len() - unit.len_utf8()]
        .parse()
        .map_err(|_| invalid())?;

    let seconds_per_unit = match unit.to_ascii_lowercase() {
        's' => 1,
        'm' => 60,
        'h' => 3_600,
        'd' => 86_400,
        _ => return Err(invalid()),
    };

    amount
        .checked_mul(seconds_per_unit)
        .and_then(|offset| now.checked_sub(offset))
        .ok_or_else(invalid)
}

/// Parse `<N`, `>N` or `N`
pub fn parse_numeric_filter(value: &str) -> ParamResult<NumericFilter> {
    let value = value.trim();
    let invalid = || ParamError::InvalidComparison(value.to_string());

    if let Some(rest) = value.strip_prefix('<') {
        rest.trim().parse().map(NumericFilter::Lt).map_err(|_| invalid())
    } else if let Some(rest) = value.strip_prefix('>') {
        rest.trim().parse().map(NumericFilter::Gt).map_err(|_| invalid())
    } else {
        value.parse().map(NumericFilter::Eq).map_err(|_| invalid())
    }
}

pub fn parse_bool(value: &str) -> ParamResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(ParamError::InvalidBoolean(value.to_string())),
    }
}

fn parse_direction(value: &str) -> ParamResult<SortDirection> {
    SortDirection::parse(value.trim()).ok_or_else(|| ParamError::InvalidDirection(value.to_string()))
}

fn parse_frequency(value: &str) -> ParamResult<Frequency> {
    Frequency::parse(value.trim()).ok_or_else(|| ParamError::InvalidFrequency(value.to_string()))
}

/// Parse and clamp a result size. Integers too wide for `i64` clamp like
/// any other out-of-range value.
pub fn parse_size(value: &str) -> ParamResult<usize> {
    let requested = match value.trim().parse::<i64>() {
        Ok(requested) => requested,
        Err(err) => match err.kind() {
            IntErrorKind::PosOverflow => i64::MAX,
            IntErrorKind::NegOverflow => i64::MIN,
            _ => return Err(ParamError::NotAnInteger(value.to_string())),
        },
    };
    Ok(requested.clamp(MIN_SIZE as i64, MAX_SIZE as i64) as usize)
}
