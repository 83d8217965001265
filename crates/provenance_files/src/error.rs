//! Error types for file objects.

use thiserror::Error;

/// Errors parsing a location string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    #[error("Empty location")]
    Empty,

    #[error("Location must be an absolute path: {0}")]
    Relative(String),
}

/// Error for a file kind name outside the known set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown file kind: {name} (expected one of: {expected})")]
pub struct FileKindError {
    pub name: String,
    pub expected: String,
}

/// Errors building a file object from provenance.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FileError {
    #[error("Provenance has no '{0}' field")]
    MissingField(&'static str),

    #[error("Invalid location: {0}")]
    Location(#[from] LocationError),
}
