//! Configuration loading
//!
//! Loads settings from YAML configuration files.

use crate::loader::{HttpFetcher, DEFAULT_META_URL};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when loading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {file}: {source}")]
    Read {
        file: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config {file}: {source}")]
    Parse {
        file: PathBuf,
        source: serde_yaml::Error,
    },
}

/// Hywind settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Manifest URL used by refresh
    pub meta_url: String,
    /// Origin label stamped on every refreshed entry
    pub origin_override: Option<String>,
    /// TCP connect timeout for refresh
    pub connect_timeout_ms: u64,
    /// Response timeout for refresh
    pub read_timeout_ms: u64,
    /// Attributes whose values hold class lists
    pub class_attributes: Vec<String>,
    /// Local manifest to start from instead of the bundled one
    pub catalog_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            meta_url: DEFAULT_META_URL.to_string(),
            origin_override: None,
            connect_timeout_ms: 5000,
            read_timeout_ms: 5000,
            class_attributes: vec!["class".to_string()],
            catalog_path: None,
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            file: path.to_path_buf(),
            source,
        })?;

        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            file: path.to_path_buf(),
            source,
        })
    }

    /// Load settings from default locations
    pub fn load_default(workspace_root: &Path) -> Self {
        let candidates = [
            workspace_root.join(".hywind.yaml"),
            workspace_root.join(".hywind.yml"),
            workspace_root.join("hywind.yaml"),
            workspace_root.join("hywind.yml"),
        ];

        for candidate in &candidates {
            if candidate.exists() {
                match Self::load(candidate) {
                    Ok(settings) => {
                        tracing::debug!("loaded settings from {}", candidate.display());
                        return settings;
                    }
                    Err(e) => tracing::warn!("ignoring {}", e),
                }
            }
        }

        Self::default()
    }

    /// Origin override with blank values treated as unset.
    pub fn origin_override(&self) -> Option<&str> {
        self.origin_override
            .as_deref()
            .map(str::trim)
            .filter(|o| !o.is_empty())
    }

    pub fn is_class_attribute(&self, attribute: &str) -> bool {
        self.class_attributes
            .iter()
            .any(|a| a.eq_ignore_ascii_case(attribute))
    }

    /// HTTP fetcher honouring the configured timeouts.
    pub fn fetcher(&self) -> HttpFetcher {
        HttpFetcher::new(
            Duration::from_millis(self.connect_timeout_ms),
            Duration::from_millis(self.read_timeout_ms),
        )
    }
}
