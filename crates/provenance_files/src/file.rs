//! Catalogued file objects.

use chrono::Utc;
use provenance_db::{fields, Provenance, ProvenanceFile, Value};
use provenance_ids::{FileId, SeriesUid};

use crate::error::FileError;
use crate::kind::FileKind;
use crate::location::Location;

/// A catalogued file: its location, kind and provenance.
///
/// `key` is the `location` string exactly as stored. Records written by other
/// tools may not be in canonical form, and the key must still match them.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFile {
    key: String,
    location: Location,
    kind: FileKind,
    provenance: Provenance,
}

impl ImageFile {
    /// A newly observed file with fresh provenance (`location`, `id`,
    /// `added`).
    pub fn new(location: Location) -> Self {
        let kind = FileKind::from_path(location.path());
        let key = location.to_string();
        let provenance = Provenance::new()
            .with(fields::LOCATION, key.as_str())
            .with(fields::ID, FileId::generate().into_string())
            .with(fields::ADDED, Utc::now());
        Self {
            key,
            location,
            kind,
            provenance,
        }
    }

    /// Rebuild a file from stored provenance. `location` is required.
    pub fn from_provenance(provenance: Provenance) -> Result<Self, FileError> {
        let raw = provenance
            .get_str(fields::LOCATION)
            .ok_or(FileError::MissingField(fields::LOCATION))?;
        let location = Location::parse(raw)?;
        let kind = FileKind::from_path(location.path());
        Ok(Self {
            key: raw.to_string(),
            location,
            kind,
            provenance,
        })
    }

    pub fn as_location(&self) -> &Location {
        &self.location
    }

    pub fn kind(&self) -> FileKind {
        self.kind
    }

    pub fn id(&self) -> Option<FileId> {
        self.provenance
            .get_str(fields::ID)
            .and_then(|raw| FileId::parse(raw).ok())
    }

    pub fn approval(&self) -> Option<&str> {
        self.provenance.get_str(fields::APPROVAL)
    }

    /// Set a provenance field. `location` is fixed once the file exists.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        if key == fields::LOCATION {
            return;
        }
        self.provenance.insert(key, value);
    }

    pub fn into_provenance(self) -> Provenance {
        self.provenance
    }
}

impl ProvenanceFile for ImageFile {
    fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    fn location(&self) -> String {
        self.key.clone()
    }

    fn series_id(&self) -> Option<SeriesUid> {
        if !self.kind.has_series() {
            return None;
        }
        self.provenance
            .get_str(fields::SERIES_UID)
            .and_then(|raw| SeriesUid::parse(raw).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_file_has_identity_fields() {
        let file = ImageFile::new(Location::parse("host:/d/t1.nii").unwrap());
        assert_eq!(file.kind(), FileKind::Nifti);
        assert_eq!(
            file.provenance().get_str(fields::LOCATION),
            Some("host:/d/t1.nii")
        );
        assert!(file.id().is_some());
        assert!(file
            .provenance()
            .get(fields::ADDED)
            .and_then(Value::as_timestamp)
            .is_some());
    }

    #[test]
    fn test_from_provenance_requires_location() {
        let err = ImageFile::from_provenance(Provenance::new().with("a", 1)).unwrap_err();
        assert_eq!(err, FileError::MissingField("location"));
    }

    #[test]
    fn test_series_id_only_for_dicom() {
        let dicom = ImageFile::from_provenance(
            Provenance::new()
                .with(fields::LOCATION, "/d/IM0001.dcm")
                .with(fields::SERIES_UID, "1.2.3"),
        )
        .unwrap();
        assert_eq!(dicom.series_id(), Some(SeriesUid::parse("1.2.3").unwrap()));

        let nifti = ImageFile::from_provenance(
            Provenance::new()
                .with(fields::LOCATION, "/d/t1.nii")
                .with(fields::SERIES_UID, "1.2.3"),
        )
        .unwrap();
        assert_eq!(nifti.series_id(), None);
    }

    #[test]
    fn test_location_key_is_stored_string() {
        let file = ImageFile::from_provenance(
            Provenance::new().with(fields::LOCATION, " :/d/t1.nii "),
        )
        .unwrap();
        assert_eq!(file.location(), " :/d/t1.nii ");
        assert_eq!(file.as_location().to_string(), "/d/t1.nii");
        assert_eq!(file.kind(), FileKind::Nifti);
    }

    #[test]
    fn test_location_cannot_be_overwritten() {
        let mut file = ImageFile::new(Location::parse("/d/t1.nii").unwrap());
        file.set(fields::LOCATION, "/elsewhere");
        file.set(fields::SUBJECT, "Jane Doe");
        assert_eq!(file.provenance().get_str(fields::LOCATION), Some("/d/t1.nii"));
        assert_eq!(file.provenance().get_str(fields::SUBJECT), Some("Jane Doe"));
    }
}
