//! Key namespace for metadata records and per-object data.
//!
//! All layer keys live under one namespace and database id:
//!
//! ```text
//! {namespace}:{db_id}:M:{logical_key}   metadata record of a logical key
//! {namespace}:{db_id}:D:{object_id}     prefix of an object's data keys
//! ```
//!
//! Metadata and data regions never interleave, and the data of one object
//! instance is addressed by its identifier, not its logical key. Replacing an
//! expired object therefore orphans its old data instead of exposing it.

use crate::object::ObjectId;

/// Tag separating metadata keys from data keys.
const META_TAG: u8 = b'M';
const DATA_TAG: u8 = b'D';
const SEPARATOR: u8 = b':';

/// Builds store keys for one namespace and database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySpace {
    /// `{namespace}:{db_id}:`
    root: Vec<u8>,
}

impl KeySpace {
    /// Create a key space.
    ///
    /// `namespace` must not contain `':'`; otherwise two namespaces could share
    /// a root and see each other's keys. [`LayerConfig::validate`] rejects such
    /// namespaces before they reach here.
    ///
    /// [`LayerConfig::validate`]: crate::config::LayerConfig::validate
    pub fn new(namespace: &str, db_id: u64) -> Self {
        debug_assert!(!namespace.contains(':'), "namespace must not contain ':': {namespace:?}");
        let root = format!("{namespace}:{db_id}:").into_bytes();
        Self { root }
    }

    /// Metadata key of `logical_key`.
    pub fn meta_key(&self, logical_key: &[u8]) -> Vec<u8> {
        self.tagged(META_TAG, logical_key)
    }

    /// Prefix shared by every data key of object `id`.
    pub fn data_prefix(&self, id: &ObjectId) -> Vec<u8> {
        self.tagged(DATA_TAG, id)
    }

    fn tagged(&self, tag: u8, suffix: &[u8]) -> Vec<u8> {
        let mut key = Vec::with_capacity(self.root.len() + 2 + suffix.len());
        key.extend_from_slice(&self.root);
        key.push(tag);
        key.push(SEPARATOR);
        key.extend_from_slice(suffix);
        key
    }
}

impl Default for KeySpace {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_NAMESPACE, 0)
    }
}
