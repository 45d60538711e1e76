//! Environment configuration and dependency wiring.

mod dependencies;

pub use dependencies::Dependencies;

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::IndexerError;
use index_updater_service::FailurePolicy;

/// Default path of the index catalog file.
const DEFAULT_CATALOG_PATH: &str = "indices.json";

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable output.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!(
                "unknown log format '{}', expected 'pretty' or 'json'",
                other
            )),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pretty => f.write_str("pretty"),
            Self::Json => f.write_str("json"),
        }
    }
}

/// Service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Path of the JSON index catalog.
    pub catalog_path: PathBuf,
    /// Dispatcher failure policy.
    pub failure_policy: FailurePolicy,
    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            failure_policy: FailurePolicy::default(),
            log_format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `INDEX_CATALOG_PATH`: JSON index catalog (default: indices.json)
    /// - `DISPATCH_FAILURE_POLICY`: `fail-fast` or `isolate` (default: fail-fast)
    /// - `LOG_FORMAT`: `pretty` or `json` (default: pretty)
    pub fn from_env() -> Result<Self, IndexerError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, IndexerError> {
        let mut config = Self::default();

        if let Some(path) = lookup("INDEX_CATALOG_PATH") {
            config.catalog_path = PathBuf::from(path);
        }
        if let Some(policy) = lookup("DISPATCH_FAILURE_POLICY") {
            config.failure_policy = policy.parse().map_err(IndexerError::config)?;
        }
        if let Some(format) = lookup("LOG_FORMAT") {
            config.log_format = format.parse().map_err(IndexerError::config)?;
        }

        Ok(config)
    }
}
