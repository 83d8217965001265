//! The document store contract.
//!
//! The repository issues exactly one of these calls per public operation.
//! Implementations own their concurrency control; calls block until the
//! store answers.

use crate::document::{Document, Filter, Query};
use crate::error::StoreError;
use std::sync::Arc;

/// Result of the global sum-and-count aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    /// Sum of the integer values of the aggregated field.
    pub total: i64,
    /// Number of documents aggregated.
    pub count: u64,
}

/// Backing store for provenance documents.
pub trait DocumentStore {
    /// First document matching the filter, if any.
    fn find_one(&self, filter: &Filter) -> Result<Option<Document>, StoreError>;

    /// All documents matching the query, sorted and limited as requested.
    /// Without a sort, natural store order.
    fn find(&self, query: &Query) -> Result<Vec<Document>, StoreError>;

    /// Insert a new document. Must fail with [`StoreError::Conflict`] when a
    /// unique field collides with an existing document.
    fn insert_one(&self, document: Document) -> Result<(), StoreError>;

    /// Replace the first matching document wholesale. Returns the number of
    /// documents replaced (0 or 1); no match is not an error.
    fn replace_one(&self, filter: &Filter, document: Document) -> Result<u64, StoreError>;

    /// Set the given fields on the first matching document, leaving the
    /// rest untouched. Returns the number of documents modified.
    fn set_fields(&self, filter: &Filter, fields: Document) -> Result<u64, StoreError>;

    /// Global aggregate over every document: sum of `field` and a count.
    /// `None` when the store holds no documents.
    fn sum_and_count(&self, field: &str) -> Result<Option<Totals>, StoreError>;
}

impl<S: DocumentStore + ?Sized> DocumentStore for Arc<S> {
    fn find_one(&self, filter: &Filter) -> Result<Option<Document>, StoreError> {
        (**self).find_one(filter)
    }

    fn find(&self, query: &Query) -> Result<Vec<Document>, StoreError> {
        (**self).find(query)
    }

    fn insert_one(&self, document: Document) -> Result<(), StoreError> {
        (**self).insert_one(document)
    }

    fn replace_one(&self, filter: &Filter, document: Document) -> Result<u64, StoreError> {
        (**self).replace_one(filter, document)
    }

    fn set_fields(&self, filter: &Filter, fields: Document) -> Result<u64, StoreError> {
        (**self).set_fields(filter, fields)
    }

    fn sum_and_count(&self, field: &str) -> Result<Option<Totals>, StoreError> {
        (**self).sum_and_count(field)
    }
}

impl<S: DocumentStore + ?Sized> DocumentStore for Box<S> {
    fn find_one(&self, filter: &Filter) -> Result<Option<Document>, StoreError> {
        (**self).find_one(filter)
    }

    fn find(&self, query: &Query) -> Result<Vec<Document>, StoreError> {
        (**self).find(query)
    }

    fn insert_one(&self, document: Document) -> Result<(), StoreError> {
        (**self).insert_one(document)
    }

    fn replace_one(&self, filter: &Filter, document: Document) -> Result<u64, StoreError> {
        (**self).replace_one(filter, document)
    }

    fn set_fields(&self, filter: &Filter, fields: Document) -> Result<u64, StoreError> {
        (**self).set_fields(filter, fields)
    }

    fn sum_and_count(&self, field: &str) -> Result<Option<Totals>, StoreError> {
        (**self).sum_and_count(field)
    }
}
