//! Identifier wrappers for provenance records.
//!
//! Stored identifiers are opaque: records written by other tools may carry
//! short hashes or DICOM UIDs, so parsing only rejects blank values. Fresh
//! file ids are UUID v4 strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Error returned when parsing an identifier fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdParseError {
    message: String,
}

impl IdParseError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for IdParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for IdParseError {}

macro_rules! define_opaque_id {
    ($name:ident, $label:expr) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn parse(value: &str) -> Result<Self, IdParseError> {
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err(IdParseError::new(format!("Invalid {}: empty value", $label)));
                }
                Ok(Self(trimmed.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_opaque_id!(FileId, "file ID");
define_opaque_id!(SeriesUid, "series UID");

impl FileId {
    /// Generate a fresh random file id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique_uuids() {
        let a = FileId::generate();
        let b = FileId::generate();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(a.as_str()).is_ok());
    }

    #[test]
    fn test_parse_accepts_opaque_values() {
        let id: FileId = "abc123".parse().unwrap();
        assert_eq!(id.as_str(), "abc123");

        let uid = SeriesUid::parse(" 1.3.12.2.1107.5.2 ").unwrap();
        assert_eq!(uid.to_string(), "1.3.12.2.1107.5.2");
    }

    #[test]
    fn test_parse_rejects_blank() {
        let err = SeriesUid::parse("   ").unwrap_err();
        assert_eq!(err.to_string(), "Invalid series UID: empty value");
        assert!(FileId::parse("").is_err());
    }

    #[test]
    fn test_serde_is_transparent() {
        let id = FileId::parse("xyz").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"xyz\"");
    }
}
