//! Documents and query shapes exchanged with the store.

use crate::value::Value;
use serde::Serialize;
use std::collections::btree_map::{self, BTreeMap};

/// Well-known provenance field names.
pub mod fields {
    pub const LOCATION: &str = "location";
    pub const ID: &str = "id";
    pub const SERIES_UID: &str = "seriesuid";
    pub const SUBJECT: &str = "subject";
    pub const SIZE: &str = "size";
    pub const DURATION: &str = "duration";
    pub const APPROVAL: &str = "approval";
    pub const PARENTS: &str = "parents";
    pub const ADDED: &str = "added";
    /// Storage-only snapshot payload. Never part of domain provenance.
    pub const SNAPSHOT_DATA: &str = "_snapshot-data";
}

/// Well-known approval statuses. Any string is accepted by the store.
pub mod approval {
    pub const PENDING: &str = "pending";
    pub const GRANTED: &str = "granted";
}

/// A flat field-to-value mapping.
///
/// The same shape serves as domain provenance and as the stored document;
/// the repository converts between the two.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Document {
    fields: BTreeMap<String, Value>,
}

/// Provenance as seen by callers: a document without storage-only fields.
pub type Provenance = Document;

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a field, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.fields.get_mut(key)
    }

    /// Text value of a field, if present and textual.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.fields.iter()
    }

    pub fn iter_mut(&mut self) -> btree_map::IterMut<'_, String, Value> {
        self.fields.iter_mut()
    }

    /// Copy every field of `other` into this document.
    pub fn merge(&mut self, other: Document) {
        self.fields.extend(other.fields);
    }

    /// Render the document as JSON (time spans as seconds, binary as base64).
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Document {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl IntoIterator for Document {
    type Item = (String, Value);
    type IntoIter = btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

// ============================================================================
// Query shapes
// ============================================================================

/// Document selector.
///
/// A missing field is treated as `Null` when matching.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Every document.
    All,
    /// Field equals value (list fields: any element equals).
    Eq { field: String, value: Value },
    /// Field equals any candidate (list fields: any element in the set).
    In { field: String, values: Vec<Value> },
}

impl Filter {
    pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn is_in<I, T>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Filter::In {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Evaluate the filter against a document.
    pub fn matches(&self, document: &Document) -> bool {
        match self {
            Filter::All => true,
            Filter::Eq { field, value } => document
                .get(field)
                .unwrap_or(&Value::Null)
                .matches(value),
            Filter::In { field, values } => {
                let actual = document.get(field).unwrap_or(&Value::Null);
                values.iter().any(|candidate| actual.matches(candidate))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub order: SortOrder,
}

/// A find request: filter, then optional sort, then optional limit.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub filter: Filter,
    pub sort: Option<Sort>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new(filter: Filter) -> Self {
        Self {
            filter,
            sort: None,
            limit: None,
        }
    }

    pub fn all() -> Self {
        Self::new(Filter::All)
    }

    pub fn sort_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort = Some(Sort {
            field: field.into(),
            order,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

impl From<Filter> for Query {
    fn from(filter: Filter) -> Self {
        Query::new(filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Document {
        Document::new()
            .with(fields::LOCATION, "/p/f1")
            .with(fields::SIZE, 10)
            .with(fields::PARENTS, Value::list(["x1", "x2"]))
    }

    #[test]
    fn test_eq_filter() {
        assert!(Filter::equals(fields::LOCATION, "/p/f1").matches(&doc()));
        assert!(!Filter::equals(fields::LOCATION, "/p/f2").matches(&doc()));
        assert!(Filter::equals(fields::SIZE, 10.0).matches(&doc()));
    }

    #[test]
    fn test_eq_null_matches_missing_field() {
        assert!(Filter::equals(fields::SERIES_UID, Value::Null).matches(&doc()));
    }

    #[test]
    fn test_in_filter_over_list_field() {
        assert!(Filter::is_in(fields::PARENTS, ["x2", "x9"]).matches(&doc()));
        assert!(!Filter::is_in(fields::PARENTS, ["x8", "x9"]).matches(&doc()));
        assert!(Filter::is_in(fields::LOCATION, ["l1", "/p/f1"]).matches(&doc()));
        assert!(!Filter::is_in(fields::LOCATION, Vec::<String>::new()).matches(&doc()));
    }

    #[test]
    fn test_json_is_flat_object() {
        let json = doc().to_json().unwrap();
        assert_eq!(json["location"], "/p/f1");
        assert_eq!(json["parents"], serde_json::json!(["x1", "x2"]));
    }
}
