//! Load the Hywind catalog.
//!
//! This module handles parsing the Hywind metadata manifest from the bundled
//! default, a local file, or a remote URL.

use crate::types::{ClassEntry, PropEntry};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Public manifest published alongside HyUI-Hywind.
pub const DEFAULT_META_URL: &str =
    "https://raw.githubusercontent.com/KelpyCode/HyUI-Hywind/refs/heads/main/hywind-meta.json";

const BUNDLED_META: &str = include_str!("../data/hywind-meta.json");

/// Errors that can occur when loading a catalog from disk.
#[derive(Error, Debug)]
pub enum LoadError {
    /// Failed to read or write a file.
    #[error("Failed to read: {0}")]
    Read(#[from] std::io::Error),

    /// Failed to parse a JSON file.
    #[error("Failed to parse {file}: {source}")]
    Parse {
        file: PathBuf,
        source: serde_json::Error,
    },

    /// Failed to serialize a catalog.
    #[error("Failed to serialize catalog: {0}")]
    Serialize(serde_json::Error),

    /// The catalog file was not found.
    #[error("catalog file not found: {0}")]
    NotFound(PathBuf),
}

/// Errors that can occur when fetching a catalog over HTTP.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("network error fetching {url}: {message}")]
    Network { url: String, message: String },

    #[error("HTTP {status}: {url}")]
    Status { url: String, status: u16 },

    #[error("malformed catalog from {url}: {source}")]
    Parse {
        url: String,
        source: serde_json::Error,
    },
}

/// Immutable snapshot of known classes and props.
///
/// Names are not required to be unique; lookups return the first entry in
/// catalog order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub classes: Vec<ClassEntry>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub props: Vec<PropEntry>,
}

impl Catalog {
    /// Parse a manifest.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The manifest compiled into the crate.
    ///
    /// A malformed bundled manifest yields an empty catalog.
    pub fn load_default() -> Self {
        match Self::from_json(BUNDLED_META) {
            Ok(catalog) => {
                tracing::debug!(
                    classes = catalog.classes.len(),
                    props = catalog.props.len(),
                    "loaded bundled catalog"
                );
                catalog
            }
            Err(e) => {
                tracing::warn!("bundled catalog is malformed, starting empty: {}", e);
                Self::default()
            }
        }
    }

    /// Load a manifest from a local file.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        if !path.exists() {
            return Err(LoadError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_json(&content).map_err(|e| LoadError::Parse {
            file: path.to_path_buf(),
            source: e,
        })
    }

    /// Load from `path` if given, falling back to the bundled manifest on any
    /// error.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        match path {
            Some(path) => Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("{}; using bundled catalog", e);
                Self::load_default()
            }),
            None => Self::load_default(),
        }
    }

    /// Write the catalog as a manifest, e.g. to cache a fetched snapshot.
    pub fn save(&self, path: &Path) -> Result<(), LoadError> {
        let content = serde_json::to_string_pretty(self).map_err(LoadError::Serialize)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Fetch and parse a manifest, stamping every entry with
    /// `origin_override` when it is set and not blank.
    pub fn fetch(
        fetcher: &dyn MetaFetcher,
        url: &str,
        origin_override: Option<&str>,
    ) -> Result<Self, FetchError> {
        let body = fetcher.fetch(url)?;
        let catalog = Self::from_json(&body).map_err(|e| FetchError::Parse {
            url: url.to_string(),
            source: e,
        })?;
        Ok(catalog.with_origin(origin_override))
    }

    /// Rewrite every entry's origin. Blank or absent overrides leave the
    /// catalog as is.
    pub fn with_origin(mut self, origin: Option<&str>) -> Self {
        let Some(origin) = origin.filter(|o| !o.trim().is_empty()) else {
            return self;
        };

        for class in &mut self.classes {
            class.origin = Some(origin.to_string());
        }
        for prop in &mut self.props {
            prop.origin = Some(origin.to_string());
        }
        self
    }

    /// Total number of entries.
    pub fn len(&self) -> usize {
        self.classes.len() + self.props.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.props.is_empty()
    }
}

/// Source of manifest bodies.
pub trait MetaFetcher: Send + Sync {
    /// Fetch the raw manifest at `url`.
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

impl<F> MetaFetcher for F
where
    F: Fn(&str) -> Result<String, FetchError> + Send + Sync,
{
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self(url)
    }
}

/// Blocking HTTP fetcher with bounded timeouts.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    connect_timeout: Duration,
    read_timeout: Duration,
    user_agent: String,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_millis(5000),
            read_timeout: Duration::from_millis(5000),
            user_agent: format!("hywind-hover/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpFetcher {
    pub fn new(connect_timeout: Duration, read_timeout: Duration) -> Self {
        Self {
            connect_timeout,
            read_timeout,
            ..Self::default()
        }
    }

    fn network_error(url: &str, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else {
            FetchError::Network {
                url: url.to_string(),
                message: e.to_string(),
            }
        }
    }
}

impl MetaFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(self.connect_timeout)
            .timeout(self.read_timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| Self::network_error(url, e))?;

        let response = client
            .get(url)
            .header("User-Agent", &self.user_agent)
            .header("Accept", "application/json, */*")
            .send()
            .map_err(|e| Self::network_error(url, e))?;

        if response.status() != reqwest::StatusCode::OK {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        response.text().map_err(|e| Self::network_error(url, e))
    }
}

/// Treat an explicit `null` array like a missing one.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let value: Option<Vec<T>> = Option::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}
