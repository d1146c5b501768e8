//! Bookmark id set and its persisted JSON-array encoding.

use std::collections::BTreeSet;

use serde_json::Value;

/// Set of bookmarked `prid`s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookmarkSet {
    ids: BTreeSet<String>,
}

impl BookmarkSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the persisted value. Absent or malformed input yields an empty
    /// set; non-string array elements are skipped.
    pub fn decode(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };
        let ids = match serde_json::from_str::<Value>(raw) {
            Ok(Value::Array(values)) => values
                .into_iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
            _ => {
                tracing::debug!("bookmark value is not a JSON array; treating as empty");
                BTreeSet::new()
            }
        };
        Self { ids }
    }

    /// Encode as a JSON array of strings.
    pub fn encode(&self) -> String {
        Value::Array(self.ids.iter().cloned().map(Value::String).collect()).to_string()
    }

    pub fn contains(&self, prid: &str) -> bool {
        self.ids.contains(prid)
    }

    /// Flip membership of `prid`. Returns `true` if it is now bookmarked.
    pub fn toggle(&mut self, prid: &str) -> bool {
        if self.ids.remove(prid) {
            false
        } else {
            self.ids.insert(prid.to_string());
            true
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for BookmarkSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}
