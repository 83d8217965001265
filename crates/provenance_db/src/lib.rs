//! Persistence and query layer for provenance records.
//!
//! [`ProvenanceRepository`] is the single entry point for reading and writing
//! catalogued provenance. It talks to a [`DocumentStore`], converts between
//! domain provenance and stored documents, forwards snapshot payloads to a
//! [`SnapshotCache`], and reports misses to an [`UnknownItemListener`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use provenance_db::{MemoryDocumentStore, ProvenanceRepository, Lookup};
//!
//! let repo = ProvenanceRepository::new(store, factory, cache, listener);
//! repo.add(&file)?;
//!
//! match repo.by_location("/data/sub-01/t1.nii.gz")? {
//!     Lookup::Found(file) => println!("{:?}", file.provenance()),
//!     Lookup::Unknown(item) => println!("{} is not known", item),
//! }
//! ```

mod collaborators;
mod config;
mod document;
mod error;
mod memory;
mod repository;
mod serialization;
mod store;
mod types;
mod value;

pub use collaborators::{
    Lookup, NoSnapshots, ProvenanceFile, RecordFactory, SnapshotCache, UnknownItem,
    UnknownItemListener,
};
pub use config::{RepositoryConfig, LATEST_LIMIT_ENV};
pub use document::{approval, fields, Document, Filter, Provenance, Query, Sort, SortOrder};
pub use error::{ConfigError, RepositoryError, Result, StoreError};
pub use memory::{MemoryDocumentStore, MemoryStoreConfig};
pub use repository::ProvenanceRepository;
pub use serialization::{seconds_to_time_span, time_span_to_seconds};
pub use store::{DocumentStore, Totals};
pub use types::Statistics;
pub use value::Value;

pub use provenance_ids::{FileId, SeriesUid};
