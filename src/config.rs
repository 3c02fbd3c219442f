//! Engine configuration file support.
//!
//! Reads engine settings from a TOML configuration file, with serde-supplied
//! defaults so a missing file or a partial one still yields a working setup.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::store::StoreError;

/// Engine configuration from file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub engine: EngineSettings,
}

/// Tunables for the search engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Results per page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Upper bound on offers fetched per search.
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Batch cache time-to-live in seconds.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

fn default_page_size() -> usize {
    10
}

fn default_max_results() -> usize {
    50
}

fn default_cache_ttl_secs() -> u64 {
    600
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            max_results: default_max_results(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            engine: EngineSettings::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| StoreError::configuration(format!("Failed to read config file: {}", e)))?;

        let config: EngineConfig = toml::from_str(&content)
            .map_err(|e| StoreError::configuration(format!("Failed to parse config file: {}", e)))?;

        Ok(config)
    }

    /// Load configuration from the default locations, falling back to the
    /// built-in defaults when no file exists.
    ///
    /// Searches for `farescope.toml` in the current directory, then the
    /// parent directory.
    pub fn from_default_location() -> Result<Self, StoreError> {
        let search_paths = [
            PathBuf::from("farescope.toml"),
            PathBuf::from("../farescope.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }
}
