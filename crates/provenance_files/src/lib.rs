//! File objects and stock collaborators for the provenance repository.
//!
//! - [`FileFactory`]: the record factory, dispatching on [`FileKind`]
//! - [`ImageFile`]: a catalogued file and its provenance
//! - [`Location`]: `hostname:/abs/path` keys
//! - [`MemorySnapshotCache`], [`TracingListener`]: default collaborators

mod cache;
mod error;
mod factory;
mod file;
mod kind;
mod listener;
mod location;

pub use cache::MemorySnapshotCache;
pub use error::{FileError, FileKindError, LocationError};
pub use factory::FileFactory;
pub use file::ImageFile;
pub use kind::FileKind;
pub use listener::TracingListener;
pub use location::Location;
