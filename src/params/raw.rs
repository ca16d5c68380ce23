//! # Raw Parameter Bag
//!
//! Query-string pairs as received. Keys are case-folded on insertion; values
//! are kept verbatim.

/// Keys whose values may be lists, either by repeating the key or by
/// separating values with commas.
const LIST_KEYS: &[&str] = &["subreddit", "author", "aggs", "fields", "ids"];

/// Case-insensitive, possibly multi-valued parameter bag
#[derive(Debug, Clone, Default)]
pub struct RawParams {
    entries: Vec<(String, String)>,
}

impl RawParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from key/value pairs, preserving order
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut raw = Self::new();
        for (key, value) in pairs {
            raw.push(key.as_ref(), value);
        }
        raw
    }

    pub fn push(&mut self, key: &str, value: impl Into<String>) {
        self.entries.push((key.trim().to_lowercase(), value.into()));
    }

    /// The last non-blank value given for `key`
    pub fn last(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.trim())
            .find(|v| !v.is_empty())
    }

    /// Every value given for `key`. List keys are also split on commas.
    pub fn all(&self, key: &str) -> Vec<&str> {
        let split = LIST_KEYS.contains(&key);
        let mut values = Vec::new();
        for (_, value) in self.entries.iter().filter(|(k, _)| k == key) {
            if split {
                values.extend(value.split(',').map(str::trim).filter(|v| !v.is_empty()));
            } else if !value.trim().is_empty() {
                values.push(value.trim());
            }
        }
        values
    }

    /// All pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_case_folded() {
        let raw = RawParams::from_pairs([("SubReddit", "Python")]);
        assert_eq!(raw.iter().collect::<Vec<_>>(), vec![("subreddit", "Python")]);
        assert_eq!(raw.last("subreddit"), Some("Python"));
    }

    #[test]
    fn test_list_keys_split_on_commas() {
        let raw = RawParams::from_pairs([("author", "a,b"), ("AUTHOR", "c")]);
        assert_eq!(raw.all("author"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_text_keys_keep_commas() {
        let raw = RawParams::from_pairs([("q", "rust, go")]);
        assert_eq!(raw.all("q"), vec!["rust, go"]);
    }

    #[test]
    fn test_last_skips_blank_values() {
        let raw = RawParams::from_pairs([("size", "10"), ("size", "  ")]);
        assert_eq!(raw.last("size"), Some("10"));
        assert_eq!(raw.last("sort"), None);
    }
}
