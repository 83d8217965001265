//! Repository configuration.
//!
//! Loading configuration files is the host's job; this module only defines
//! the settings, their defaults, and the environment overrides.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable overriding [`RepositoryConfig::latest_limit`].
pub const LATEST_LIMIT_ENV: &str = "PROVENANCE_LATEST_LIMIT";

const DEFAULT_LATEST_LIMIT: usize = 20;

/// Settings for [`crate::ProvenanceRepository`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    /// Number of records returned by `latest_default`.
    pub latest_limit: usize,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            latest_limit: DEFAULT_LATEST_LIMIT,
        }
    }
}

impl RepositoryConfig {
    /// Defaults with overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults with overrides from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(raw) = lookup(LATEST_LIMIT_ENV) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                config.latest_limit =
                    trimmed
                        .parse::<usize>()
                        .map_err(|e| ConfigError::InvalidValue {
                            key: LATEST_LIMIT_ENV.to_string(),
                            value: raw.clone(),
                            reason: e.to_string(),
                        })?;
            }
        }
        Ok(config)
    }
}
