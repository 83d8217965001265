//! In-memory document store.
//!
//! Reference implementation of [`DocumentStore`]: documents live in a
//! `Vec` in insertion order behind an `RwLock`. Unique fields are checked on
//! insert and replace; nothing else is indexed.

use std::cmp::Ordering;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::document::{fields, Document, Filter, Query, SortOrder};
use crate::error::StoreError;
use crate::store::{DocumentStore, Totals};
use crate::value::Value;

/// Configuration for [`MemoryDocumentStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryStoreConfig {
    /// Fields whose non-null values must be unique across documents.
    pub unique_fields: Vec<String>,
}

impl Default for MemoryStoreConfig {
    fn default() -> Self {
        Self {
            unique_fields: vec![fields::LOCATION.to_string()],
        }
    }
}

/// In-memory document store.
///
/// Suitable for tests and for embedding the repository without a server.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    documents: RwLock<Vec<Document>>,
    config: MemoryStoreConfig,
}

impl MemoryDocumentStore {
    /// Create an empty store with `location` as the unique key.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MemoryStoreConfig) -> Self {
        Self {
            documents: RwLock::new(Vec::new()),
            config,
        }
    }

    /// Number of stored documents.
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.read()?.is_empty())
    }

    /// Copy of every stored document exactly as persisted.
    pub fn snapshot(&self) -> Result<Vec<Document>, StoreError> {
        Ok(self.read()?.clone())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Document>>, StoreError> {
        self.documents
            .read()
            .map_err(|_| StoreError::unavailable("document lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<Document>>, StoreError> {
        self.documents
            .write()
            .map_err(|_| StoreError::unavailable("document lock poisoned"))
    }

    /// Check unique fields of `candidate` against every document except the
    /// one at `skip`.
    fn check_unique(
        &self,
        documents: &[Document],
        candidate: &Document,
        skip: Option<usize>,
    ) -> Result<(), StoreError> {
        for field in &self.config.unique_fields {
            let Some(value) = candidate.get(field).filter(|v| !v.is_null()) else {
                continue;
            };
            let clash = documents
                .iter()
                .enumerate()
                .filter(|(idx, _)| Some(*idx) != skip)
                .any(|(_, doc)| doc.get(field).is_some_and(|v| v.loosely_eq(value)));
            if clash {
                return Err(StoreError::conflict(field.clone(), value.to_label()));
            }
        }
        Ok(())
    }
}

fn compare_field(a: &Document, b: &Document, field: &str) -> Ordering {
    let left = a.get(field).unwrap_or(&Value::Null);
    let right = b.get(field).unwrap_or(&Value::Null);
    left.canonical_cmp(right)
}

impl DocumentStore for MemoryDocumentStore {
    fn find_one(&self, filter: &Filter) -> Result<Option<Document>, StoreError> {
        let documents = self.read()?;
        Ok(documents.iter().find(|doc| filter.matches(doc)).cloned())
    }

    fn find(&self, query: &Query) -> Result<Vec<Document>, StoreError> {
        let documents = self.read()?;
        let mut matched: Vec<Document> = documents
            .iter()
            .filter(|doc| query.filter.matches(doc))
            .cloned()
            .collect();
        drop(documents);

        if let Some(sort) = &query.sort {
            matched.sort_by(|a, b| {
                let ord = compare_field(a, b, &sort.field);
                match sort.order {
                    SortOrder::Ascending => ord,
                    SortOrder::Descending => ord.reverse(),
                }
            });
        }
        if let Some(limit) = query.limit {
            matched.truncate(limit);
        }
        Ok(matched)
    }

    fn insert_one(&self, document: Document) -> Result<(), StoreError> {
        let mut documents = self.write()?;
        self.check_unique(&documents, &document, None)?;
        documents.push(document);
        debug!(count = documents.len(), "Inserted document");
        Ok(())
    }

    fn replace_one(&self, filter: &Filter, document: Document) -> Result<u64, StoreError> {
        let mut documents = self.write()?;
        let Some(idx) = documents.iter().position(|doc| filter.matches(doc)) else {
            return Ok(0);
        };
        self.check_unique(&documents, &document, Some(idx))?;
        documents[idx] = document;
        Ok(1)
    }

    fn set_fields(&self, filter: &Filter, fields: Document) -> Result<u64, StoreError> {
        let mut documents = self.write()?;
        let Some(idx) = documents.iter().position(|doc| filter.matches(doc)) else {
            return Ok(0);
        };
        let mut updated = documents[idx].clone();
        updated.merge(fields);
        self.check_unique(&documents, &updated, Some(idx))?;
        documents[idx] = updated;
        Ok(1)
    }

    fn sum_and_count(&self, field: &str) -> Result<Option<Totals>, StoreError> {
        let documents = self.read()?;
        if documents.is_empty() {
            return Ok(None);
        }
        // Non-integer values do not contribute to the sum.
        let total = documents
            .iter()
            .filter_map(|doc| doc.get(field).and_then(Value::as_i64))
            .fold(0i64, i64::saturating_add);
        Ok(Some(Totals {
            total,
            count: documents.len() as u64,
        }))
    }
}
