//! Error types for the persistence layer.
//!
//! Misses are not errors: they are reported through [`crate::Lookup`] and
//! the unknown-item listener.

use std::error::Error as StdError;

use thiserror::Error;

/// Repository operation result type.
pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Errors raised by a document store implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Connectivity failure or the store cannot serve requests.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Write rejected because a unique field already holds the value.
    #[error("Duplicate {field}: {value}")]
    Conflict { field: String, value: String },
}

impl StoreError {
    /// Create an unavailable error.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create a unique-key conflict error.
    pub fn conflict(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Conflict {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

/// Errors surfaced by [`crate::ProvenanceRepository`].
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Store failures propagate unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A stored document cannot be restored into provenance.
    #[error("Malformed record field '{field}': {reason}")]
    MalformedRecord { field: String, reason: String },

    /// The record factory rejected a provenance mapping.
    #[error("Record factory error: {0}")]
    Factory(#[source] Box<dyn StdError + Send + Sync>),
}

impl RepositoryError {
    /// Create a malformed record error.
    pub fn malformed(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a factory error from the factory's own error (or a message).
    pub fn factory(source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self::Factory(source.into())
    }
}

/// Errors from reading configuration overrides.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}' ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}
