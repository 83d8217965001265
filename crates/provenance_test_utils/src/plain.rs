//! A file object that accepts any provenance.
//!
//! Useful where the stock factory's `location` requirement gets in the way,
//! e.g. checking how `{a: 1}` round-trips through the store.

use provenance_db::{fields, Provenance, ProvenanceFile, RecordFactory};
use provenance_ids::SeriesUid;

#[derive(Debug, Clone, PartialEq)]
pub struct PlainFile {
    pub provenance: Provenance,
}

impl PlainFile {
    pub fn new(provenance: Provenance) -> Self {
        Self { provenance }
    }
}

impl ProvenanceFile for PlainFile {
    fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    fn location(&self) -> String {
        self.provenance
            .get_str(fields::LOCATION)
            .unwrap_or_default()
            .to_string()
    }

    fn series_id(&self) -> Option<SeriesUid> {
        self.provenance
            .get_str(fields::SERIES_UID)
            .and_then(|raw| SeriesUid::parse(raw).ok())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PlainFactory;

impl RecordFactory for PlainFactory {
    type File = PlainFile;

    fn from_provenance(&self, provenance: Provenance) -> provenance_db::Result<PlainFile> {
        Ok(PlainFile::new(provenance))
    }
}
