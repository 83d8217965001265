//! Canonical file locations.
//!
//! A location is an absolute path, optionally qualified by the host it lives
//! on: `hostname:/abs/path`. Its string form is the `location` key stored
//! with each record.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::LocationError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    hostname: Option<String>,
    path: PathBuf,
}

impl Location {
    /// A location on `hostname` (or unqualified when `None`).
    pub fn new(hostname: Option<&str>, path: impl AsRef<Path>) -> Result<Self, LocationError> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(LocationError::Empty);
        }
        if !path.is_absolute() {
            return Err(LocationError::Relative(path.display().to_string()));
        }
        Ok(Self {
            hostname: hostname.filter(|h| !h.is_empty()).map(str::to_string),
            path: path.to_path_buf(),
        })
    }

    /// Parse `hostname:/path` or a bare `/path`.
    pub fn parse(raw: &str) -> Result<Self, LocationError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(LocationError::Empty);
        }
        match raw.split_once(':') {
            Some((host, path)) if !host.contains('/') && path.starts_with('/') => {
                Self::new(Some(host), path)
            }
            _ => Self::new(None, raw),
        }
    }

    pub fn hostname(&self) -> Option<&str> {
        self.hostname.as_deref()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name component, if any.
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.hostname {
            Some(host) => write!(f, "{}:{}", host, self.path.display()),
            None => write!(f, "{}", self.path.display()),
        }
    }
}

impl FromStr for Location {
    type Err = LocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_qualified() {
        let loc = Location::parse("scanner-3:/data/sub-01/t1.nii").unwrap();
        assert_eq!(loc.hostname(), Some("scanner-3"));
        assert_eq!(loc.path(), Path::new("/data/sub-01/t1.nii"));
        assert_eq!(loc.to_string(), "scanner-3:/data/sub-01/t1.nii");
    }

    #[test]
    fn test_parse_bare_path() {
        let loc: Location = "/p/f1".parse().unwrap();
        assert_eq!(loc.hostname(), None);
        assert_eq!(loc.to_string(), "/p/f1");
        assert_eq!(loc.file_name(), Some("f1"));
    }

    #[test]
    fn test_rejects_relative_and_empty() {
        assert_eq!(Location::parse("  "), Err(LocationError::Empty));
        assert_eq!(
            Location::parse("data/f1"),
            Err(LocationError::Relative("data/f1".to_string()))
        );
        assert!(Location::parse("host:relative").is_err());
    }
}
