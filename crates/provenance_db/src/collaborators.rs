//! Capabilities the repository needs from the outside world.
//!
//! Each is a narrow trait injected into [`crate::ProvenanceRepository`].

use std::fmt;
use std::sync::Arc;

use provenance_ids::SeriesUid;

use crate::document::Provenance;
use crate::error::Result;

/// Read access the repository needs on a domain file object.
pub trait ProvenanceFile {
    /// The domain provenance mapping.
    fn provenance(&self) -> &Provenance;

    /// String form of the file's canonical location.
    fn location(&self) -> String;

    /// Series this file belongs to, if its kind supports series.
    fn series_id(&self) -> Option<SeriesUid>;
}

/// Builds domain file objects from restored provenance.
pub trait RecordFactory {
    type File: ProvenanceFile;

    /// Receives provenance with time spans restored and the snapshot field
    /// already stripped.
    fn from_provenance(&self, provenance: Provenance) -> Result<Self::File>;
}

/// Side cache for rendered snapshot previews.
pub trait SnapshotCache<F: ?Sized> {
    /// Snapshot bytes for `file`, if the cache holds any.
    fn get_bytes(&self, file: &F) -> Option<Vec<u8>>;

    /// Take ownership of snapshot bytes read back from the store.
    fn keep(&self, bytes: Vec<u8>, file: &F);
}

/// Notification sink for lookups that found nothing.
pub trait UnknownItemListener {
    fn unknown_file(&self, label: &str);
}

impl<F: ?Sized, C: SnapshotCache<F> + ?Sized> SnapshotCache<F> for Arc<C> {
    fn get_bytes(&self, file: &F) -> Option<Vec<u8>> {
        (**self).get_bytes(file)
    }

    fn keep(&self, bytes: Vec<u8>, file: &F) {
        (**self).keep(bytes, file)
    }
}

impl<L: UnknownItemListener + ?Sized> UnknownItemListener for Arc<L> {
    fn unknown_file(&self, label: &str) {
        (**self).unknown_file(label)
    }
}

/// A cache that never holds snapshots and discards what it is given.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSnapshots;

impl<F: ?Sized> SnapshotCache<F> for NoSnapshots {
    fn get_bytes(&self, _file: &F) -> Option<Vec<u8>> {
        None
    }

    fn keep(&self, _bytes: Vec<u8>, _file: &F) {}
}

// ============================================================================
// Lookup outcomes
// ============================================================================

/// The key of a lookup that matched nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnknownItem {
    Location(String),
    Id(String),
    Series(SeriesUid),
    /// Series lookup for a file that has no series id.
    NoSeries,
}

impl UnknownItem {
    /// Label handed to the listener.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for UnknownItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Location(path) => write!(f, "{}", path),
            Self::Id(id) => write!(f, "id: {}", id),
            Self::Series(uid) => write!(f, "seriesuid: {}", uid),
            Self::NoSeries => write!(f, "seriesuid: <none>"),
        }
    }
}

/// Outcome of an identity lookup. A miss is not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    Unknown(UnknownItem),
}

impl<T> Lookup<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    pub fn found(&self) -> Option<&T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::Unknown(_) => None,
        }
    }

    pub fn unknown(&self) -> Option<&UnknownItem> {
        match self {
            Lookup::Found(_) => None,
            Lookup::Unknown(item) => Some(item),
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::Unknown(_) => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Lookup::Found(value) => Lookup::Found(f(value)),
            Lookup::Unknown(item) => Lookup::Unknown(item),
        }
    }
}

impl<T> From<Lookup<T>> for Option<T> {
    fn from(lookup: Lookup<T>) -> Self {
        lookup.into_option()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_item_labels() {
        assert_eq!(UnknownItem::Location("/p/f1".into()).label(), "/p/f1");
        assert_eq!(UnknownItem::Id("xxxx".into()).label(), "id: xxxx");
        let uid = SeriesUid::parse("123abc").unwrap();
        assert_eq!(UnknownItem::Series(uid).label(), "seriesuid: 123abc");
        assert_eq!(UnknownItem::NoSeries.label(), "seriesuid: <none>");
    }

    #[test]
    fn test_lookup_accessors() {
        let hit: Lookup<u8> = Lookup::Found(7);
        assert!(hit.is_found());
        assert_eq!(hit.map(|v| v * 2).into_option(), Some(14));

        let miss: Lookup<u8> = Lookup::Unknown(UnknownItem::Id("q".into()));
        assert!(!miss.is_found());
        assert_eq!(miss.unknown(), Some(&UnknownItem::Id("q".into())));
        assert_eq!(Option::<u8>::from(miss), None);
    }
}
