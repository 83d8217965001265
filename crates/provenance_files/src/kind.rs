//! File kinds, dispatched from a location's extension.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FileKindError;

/// Kinds of catalogued files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// Anything without a dedicated kind.
    Generic,
    /// NIfTI-1 volume (`.nii`, `.nii.gz`).
    Nifti,
    /// DICOM image (`.dcm`); carries a series UID.
    Dicom,
    /// Philips PAR/REC pair (`.par`, `.rec`).
    Parrec,
    /// Neuroscan continuous EEG (`.cnt`).
    #[serde(rename = "cnt")]
    EegCnt,
    /// Elekta/Neuromag FIF (`.fif`).
    Fif,
    /// BIDS sidecar metadata (`.json`).
    Sidecar,
}

impl FileKind {
    pub const ALL: [FileKind; 7] = [
        FileKind::Generic,
        FileKind::Nifti,
        FileKind::Dicom,
        FileKind::Parrec,
        FileKind::EegCnt,
        FileKind::Fif,
        FileKind::Sidecar,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Nifti => "nifti",
            Self::Dicom => "dicom",
            Self::Parrec => "parrec",
            Self::EegCnt => "cnt",
            Self::Fif => "fif",
            Self::Sidecar => "sidecar",
        }
    }

    /// Parse a kind name, failing with the list of valid names.
    pub fn parse(name: &str) -> Result<Self, FileKindError> {
        let lowered = name.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == lowered)
            .ok_or_else(|| FileKindError {
                name: name.to_string(),
                expected: Self::ALL
                    .iter()
                    .map(FileKind::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    /// Kind implied by a path's extension.
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        if name.ends_with(".nii") || name.ends_with(".nii.gz") {
            Self::Nifti
        } else if name.ends_with(".dcm") {
            Self::Dicom
        } else if name.ends_with(".par") || name.ends_with(".rec") {
            Self::Parrec
        } else if name.ends_with(".cnt") {
            Self::EegCnt
        } else if name.ends_with(".fif") {
            Self::Fif
        } else if name.ends_with(".json") {
            Self::Sidecar
        } else {
            Self::Generic
        }
    }

    /// Whether files of this kind belong to a series.
    pub fn has_series(&self) -> bool {
        matches!(self, Self::Dicom)
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FileKind {
    type Err = FileKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_roundtrip() {
        for kind in FileKind::ALL {
            assert_eq!(FileKind::parse(kind.as_str()).unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_name_lists_valid_kinds() {
        let err = FileKind::parse("poetry").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown file kind: poetry (expected one of: generic, nifti, dicom, parrec, cnt, fif, sidecar)"
        );
    }

    #[test]
    fn test_from_path() {
        assert_eq!(FileKind::from_path(Path::new("/d/t1.nii.gz")), FileKind::Nifti);
        assert_eq!(FileKind::from_path(Path::new("/d/IM0001.DCM")), FileKind::Dicom);
        assert_eq!(FileKind::from_path(Path::new("/d/scan.PAR")), FileKind::Parrec);
        assert_eq!(FileKind::from_path(Path::new("/d/eeg/stub.cnt")), FileKind::EegCnt);
        assert_eq!(FileKind::from_path(Path::new("/d/raw.fif")), FileKind::Fif);
        assert_eq!(
            FileKind::from_path(Path::new("/bids/sub-01_T1w.json")),
            FileKind::Sidecar
        );
        assert_eq!(FileKind::from_path(Path::new("/d/notes.txt")), FileKind::Generic);
    }

    #[test]
    fn test_serde_uses_kind_names() {
        for kind in FileKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
            assert_eq!(serde_json::from_str::<FileKind>(&json).unwrap(), kind);
        }
    }

    #[test]
    fn test_only_dicom_has_series() {
        let with_series: Vec<_> = FileKind::ALL.into_iter().filter(FileKind::has_series).collect();
        assert_eq!(with_series, vec![FileKind::Dicom]);
    }
}
