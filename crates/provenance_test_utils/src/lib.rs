//! Provenance Test Utilities
//!
//! Doubles and fixtures shared by the repository and file-object test suites.
//!
//! # Usage
//!
//! ```rust,ignore
//! use provenance_test_utils::{plain_repository, PlainFile, RecordingListener};
//!
//! let harness = plain_repository();
//! harness.repo.by_location("/p/f1").unwrap();
//! assert_eq!(harness.listener.labels(), vec!["/p/f1"]);
//! ```

pub mod doubles;
pub mod fixtures;
pub mod plain;

// Re-exports for convenience
pub use doubles::{CountingStore, FailingStore, RecordingListener, ScriptedSnapshotCache};
pub use fixtures::{
    added_at, init_test_tracing, plain_repository, plain_repository_with, sample_record,
    seed_store, PlainHarness, SharedStore,
};
pub use plain::{PlainFactory, PlainFile};
