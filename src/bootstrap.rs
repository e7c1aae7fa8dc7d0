//! Configuration loading and store selection for processes embedding the layer.
//!
//! [`load_config`] resolves a [`LayerConfig`] from its sources and validates
//! it. [`open_store`] turns a configuration into a ready [`Store`]: redb when
//! `data_path` is set, in-memory otherwise.

use std::path::Path;

use anyhow::Context;
use anyhow::Result;
use tessera_kv::Store;
use tessera_layer::LayerConfig;
use tracing::info;

/// Load configuration from multiple sources with proper precedence.
///
/// Configuration precedence (lowest to highest):
/// 1. Environment variables (TESSERA_*)
/// 2. TOML configuration file, when `toml_path` is given
/// 3. `overrides`, typically built by the embedding process
///
/// The merged configuration is validated before it is returned.
pub fn load_config(toml_path: Option<&Path>, overrides: LayerConfig) -> Result<LayerConfig> {
    let mut config = LayerConfig::from_env();

    if let Some(path) = toml_path {
        let toml_config =
            LayerConfig::from_toml_file(path).with_context(|| format!("failed to load config from {}", path.display()))?;
        config.merge(toml_config);
    }

    config.merge(overrides);

    config.validate().context("configuration validation failed")?;

    Ok(config)
}

/// Open the store described by `config`.
///
/// The configuration is validated first so an invalid namespace never reaches
/// a [`KeySpace`](tessera_layer::KeySpace).
pub fn open_store(config: &LayerConfig) -> Result<Store> {
    config.validate().context("configuration validation failed")?;

    let store = Store::open(config.data_path.as_deref()).context("failed to open store")?;

    info!(
        backend = store.backend_name(),
        namespace = %config.namespace,
        db_id = config.db_id,
        "store ready"
    );
    Ok(store)
}
