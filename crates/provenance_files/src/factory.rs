//! Record factory producing [`ImageFile`]s.

use provenance_db::{Provenance, RecordFactory, RepositoryError};

use crate::error::FileError;
use crate::file::ImageFile;
use crate::location::Location;

/// Builds [`ImageFile`]s, picking the kind from the location's extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileFactory;

impl FileFactory {
    pub fn new() -> Self {
        Self
    }

    /// A newly observed file at `raw`.
    pub fn locate(&self, raw: &str) -> Result<ImageFile, FileError> {
        Ok(ImageFile::new(Location::parse(raw)?))
    }
}

impl RecordFactory for FileFactory {
    type File = ImageFile;

    fn from_provenance(&self, provenance: Provenance) -> provenance_db::Result<ImageFile> {
        ImageFile::from_provenance(provenance).map_err(RepositoryError::factory)
    }
}
