//! Layer configuration loaded from environment variables and TOML files.

use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use snafu::ResultExt;
use snafu::Snafu;
use tessera_kv::MAX_TXN_RETRIES;

use crate::keys::KeySpace;

/// Namespace used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "tessera";

/// Configuration for a layer deployment.
///
/// Configuration is loaded in layers with the following precedence (lowest to highest):
/// 1. Environment variables (TESSERA_*)
/// 2. TOML configuration file
///
/// This means TOML config overrides environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerConfig {
    /// Key namespace shared by every object. Must not contain `':'`.
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Logical database number inside the namespace.
    #[serde(default)]
    pub db_id: u64,

    /// Path of the redb database file. `None` selects an in-memory store.
    ///
    /// Consumed by [`Store::open`](tessera_kv::Store::open).
    pub data_path: Option<PathBuf>,

    /// Attempts made by a caller-side transaction runner before giving up on conflicts.
    #[serde(default = "default_max_txn_retries")]
    pub max_txn_retries: u32,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            db_id: 0,
            data_path: None,
            max_txn_retries: default_max_txn_retries(),
        }
    }
}

impl LayerConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).context(ReadFileSnafu { path })?;
        toml::from_str(&content).context(ParseTomlSnafu { path })
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            namespace: parse_env("TESSERA_NAMESPACE").unwrap_or_else(default_namespace),
            db_id: parse_env("TESSERA_DB_ID").unwrap_or(0),
            data_path: parse_env("TESSERA_DATA_PATH"),
            max_txn_retries: parse_env("TESSERA_MAX_TXN_RETRIES").unwrap_or_else(default_max_txn_retries),
        }
    }

    /// Merge configuration from another source.
    ///
    /// Fields in `other` that are `Some` or non-default override fields in `self`.
    pub fn merge(&mut self, other: Self) {
        if other.namespace != default_namespace() {
            self.namespace = other.namespace;
        }
        if other.db_id != 0 {
            self.db_id = other.db_id;
        }
        if other.data_path.is_some() {
            self.data_path = other.data_path;
        }
        if other.max_txn_retries != default_max_txn_retries() {
            self.max_txn_retries = other.max_txn_retries;
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.namespace.is_empty() {
            return Err(ConfigError::Validation {
                message: "namespace must be non-empty".into(),
            });
        }

        if self.namespace.contains(':') {
            return Err(ConfigError::Validation {
                message: format!("namespace {:?} must not contain ':'", self.namespace),
            });
        }

        if self.max_txn_retries == 0 {
            return Err(ConfigError::Validation {
                message: "max_txn_retries must be non-zero".into(),
            });
        }

        Ok(())
    }

    /// Key space described by `namespace` and `db_id`.
    pub fn keyspace(&self) -> KeySpace {
        KeySpace::new(&self.namespace, self.db_id)
    }
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.into()
}

fn default_max_txn_retries() -> u32 {
    MAX_TXN_RETRIES
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok()?.parse().ok()
}

/// Configuration loading and parsing errors.
#[derive(Debug, Snafu)]
pub enum ConfigError {
    #[snafu(display("failed to read config file {}: {source}", path.display()))]
    ReadFile { path: PathBuf, source: std::io::Error },

    #[snafu(display("failed to parse TOML config file {}: {source}", path.display()))]
    ParseToml { path: PathBuf, source: toml::de::Error },

    #[snafu(display("configuration validation failed: {message}"))]
    Validation { message: String },
}
