//! In-memory snapshot cache.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use provenance_db::{ProvenanceFile, SnapshotCache};
use tracing::debug;

/// Snapshot bytes keyed by file location.
///
/// Holds everything it is given; eviction is left to whoever replaces it
/// with a bounded cache.
#[derive(Debug, Default)]
pub struct MemorySnapshotCache {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemorySnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, location: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(location.into(), bytes.into());
    }

    pub fn get(&self, location: &str) -> Option<Vec<u8>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(location)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<F: ProvenanceFile> SnapshotCache<F> for MemorySnapshotCache {
    fn get_bytes(&self, file: &F) -> Option<Vec<u8>> {
        self.get(&file.location())
    }

    fn keep(&self, bytes: Vec<u8>, file: &F) {
        let location = file.location();
        debug!(location = %location, bytes = bytes.len(), "Keeping snapshot");
        self.insert(location, bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::ImageFile;
    use crate::location::Location;

    #[test]
    fn test_keep_then_get_bytes() {
        let cache = MemorySnapshotCache::new();
        let file = ImageFile::new(Location::parse("/d/t1.nii").unwrap());
        assert_eq!(SnapshotCache::<ImageFile>::get_bytes(&cache, &file), None);

        cache.keep(vec![1, 2, 3], &file);
        assert_eq!(cache.get_bytes(&file), Some(vec![1, 2, 3]));
        assert_eq!(cache.len(), 1);
    }
}
