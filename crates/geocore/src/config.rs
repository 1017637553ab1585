//! Provider configuration loading and endpoint resolution.

use records_protocol::{ProviderError, Queryables};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::repair::RepairStrategy;

/// Default geoCore endpoint for searches.
pub const DEFAULT_QUERY_ENDPOINT: &str = "geo";
/// Default geoCore endpoint for identifier lookups.
pub const DEFAULT_GET_ENDPOINT: &str = "id";

/// Errors raised while loading a provider definition.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse provider definition: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to parse provider definition: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Invalid(String),
}

impl From<ConfigError> for ProviderError {
    fn from(err: ConfigError) -> Self {
        ProviderError::Configuration(err.to_string())
    }
}

/// geoCore provider definition, as found in the host's YAML configuration.
///
/// ```yaml
/// base_url: https://geocore.api.geo.ca
/// mapping:
///   query: geo
///   get: id
/// repair: scan
/// queryables:
///   keyword:
///     type: string
///     separator: ","
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeoCoreConfig {
    /// Root URL of the geoCore API.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Endpoint names keyed by operation (`query`, `get`).
    #[serde(default)]
    pub mapping: HashMap<String, String>,

    #[serde(default)]
    pub queryables: Queryables,

    #[serde(default)]
    pub repair: RepairStrategy,

    /// Transport timeout; the HTTP client default applies when unset.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl GeoCoreConfig {
    /// Configuration pointing at `base_url` with default endpoints.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            ..Default::default()
        }
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load a provider definition from a YAML file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_yaml_str(&content)?;
        tracing::info!(
            path = ?path,
            queryables = config.queryables.len(),
            "Loaded geoCore provider definition"
        );
        Ok(config)
    }

    /// Build from a provider definition already parsed by the host.
    ///
    /// Hosts nest the connection settings in a `data` block; its keys are
    /// merged over the remaining top-level ones.
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        let value = match value {
            Value::Object(mut definition) => match definition.remove("data") {
                Some(Value::Object(data)) => {
                    definition.extend(data);
                    Value::Object(definition)
                }
                Some(other) => {
                    return Err(ConfigError::Invalid(format!(
                        "data must be a mapping, got {}",
                        other
                    )))
                }
                None => Value::Object(definition),
            },
            other => other,
        };
        Ok(serde_json::from_value(value)?)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Validate the definition and compute the endpoint URLs.
    pub fn endpoints(&self) -> Result<Endpoints, ConfigError> {
        let base = self
            .base_url
            .as_deref()
            .map(|url| url.trim().trim_end_matches('/'))
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ConfigError::Invalid("base_url is required".to_string()))?;

        if self.mapping.is_empty() {
            tracing::warn!("no endpoint mapping configured, using defaults");
        }

        let endpoint = |name: &str, default: &str| {
            let path = self
                .mapping
                .get(name)
                .map(|p| p.trim_matches('/'))
                .filter(|p| !p.is_empty())
                .unwrap_or(default);
            format!("{}/{}", base, path)
        };

        Ok(Endpoints {
            base_url: format!("{}/", base),
            query_url: endpoint("query", DEFAULT_QUERY_ENDPOINT),
            get_url: endpoint("get", DEFAULT_GET_ENDPOINT),
        })
    }
}

/// Resolved geoCore URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Base URL with exactly one trailing slash.
    pub base_url: String,
    pub query_url: String,
    pub get_url: String,
}
