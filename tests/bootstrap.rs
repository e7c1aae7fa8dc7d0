//! Configuration resolution and backend selection through the public entry points.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use tempfile::NamedTempFile;
use tempfile::TempDir;
use tessera::init_tracing;
use tessera::kv::Store;
use tessera::kv::transact;
use tessera::layer::LayerConfig;
use tessera::layer::LayerError;
use tessera::layer::SetHandle;
use tessera::layer::SystemClock;
use tessera::load_config;
use tessera::open_store;

fn add(store: &Store, config: &LayerConfig, key: &[u8], members: &[&str]) -> Result<u64> {
    let keys = config.keyspace();
    let added = transact(store, config.max_txn_retries, |txn| -> Result<u64, LayerError> {
        SetHandle::load(txn, &keys, &SystemClock, key)?.sadd(members)
    })?;
    Ok(added)
}

fn members(store: &Store, config: &LayerConfig, key: &[u8]) -> Result<Vec<Vec<u8>>> {
    let keys = config.keyspace();
    let members = transact(store, config.max_txn_retries, |txn| -> Result<Vec<Vec<u8>>, LayerError> {
        SetHandle::load(txn, &keys, &SystemClock, key)?.smembers()
    })?;
    Ok(members)
}

#[test]
fn test_load_config_precedence() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "namespace = \"filens\"")?;
    writeln!(file, "max_txn_retries = 5")?;

    std::env::set_var("TESSERA_NAMESPACE", "envns");
    std::env::set_var("TESSERA_DB_ID", "3");
    std::env::set_var("TESSERA_MAX_TXN_RETRIES", "9");
    let overrides = LayerConfig {
        data_path: Some(PathBuf::from("/srv/override.redb")),
        ..Default::default()
    };
    let config = load_config(Some(file.path()), overrides);
    for var in ["TESSERA_NAMESPACE", "TESSERA_DB_ID", "TESSERA_MAX_TXN_RETRIES"] {
        std::env::remove_var(var);
    }
    let config = config?;

    assert_eq!(config.namespace, "filens");
    assert_eq!(config.db_id, 3);
    assert_eq!(config.max_txn_retries, 5);
    assert_eq!(config.data_path, Some(PathBuf::from("/srv/override.redb")));
    Ok(())
}

#[test]
fn test_load_config_rejects_invalid_file() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "namespace = \"a:b\"")?;
    let err = load_config(Some(file.path()), LayerConfig::default()).unwrap_err();
    assert!(format!("{err:#}").contains("must not contain ':'"));

    let err = load_config(Some(std::path::Path::new("/nonexistent/tessera.toml")), LayerConfig::default()).unwrap_err();
    assert!(err.to_string().contains("failed to load config"));
    Ok(())
}

#[test]
fn test_open_store_defaults_to_memory() -> Result<()> {
    init_tracing("warn");
    let config = LayerConfig::default();
    let store = open_store(&config)?;
    assert!(matches!(store, Store::Memory(_)));

    assert_eq!(add(&store, &config, b"k", &["a", "b"])?, 2);
    assert_eq!(members(&store, &config, b"k")?, vec![b"a".to_vec(), b"b".to_vec()]);
    Ok(())
}

#[test]
fn test_open_store_with_data_path_persists() -> Result<()> {
    init_tracing("warn");
    let dir = TempDir::new()?;
    let config = LayerConfig {
        namespace: "persist".into(),
        data_path: Some(dir.path().join("data.redb")),
        ..Default::default()
    };

    {
        let store = open_store(&config)?;
        assert!(matches!(store, Store::Redb(_)));
        assert_eq!(add(&store, &config, b"k", &["x", "y"])?, 2);
    }

    let store = open_store(&config)?;
    assert_eq!(members(&store, &config, b"k")?, vec![b"x".to_vec(), b"y".to_vec()]);
    Ok(())
}

#[test]
fn test_open_store_rejects_invalid_config() {
    let config = LayerConfig {
        namespace: "bad:ns".into(),
        ..Default::default()
    };
    let err = open_store(&config).err().map(|e| format!("{e:#}"));
    assert!(err.is_some_and(|e| e.contains("must not contain ':'")));
}
