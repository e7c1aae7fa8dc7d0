//! In-memory optimistic implementation of [`KvStore`] for testing.
//!
//! Provides a deterministic, non-persistent store that mirrors the contract of
//! the redb backend without disk I/O. Transactions buffer their writes and
//! record the version of every key they read; `commit` validates the read set
//! against the shared map and fails with [`KvError::Conflict`] if any of those
//! keys changed in the meantime (FoundationDB-style optimistic concurrency).
//!
//! # Limitations
//!
//! - No persistence across restarts
//! - Range reads record the keys they return, not the gaps between them, so
//!   phantom inserts inside a scanned range are not detected

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::ops::Bound;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;
use tracing::trace;

use crate::cursor::is_empty_range;
use crate::error::KvError;
use crate::traits::KeyValue;
use crate::traits::KvStore;
use crate::traits::Transaction;
use crate::validation::check_key;
use crate::validation::check_write;

/// Version recorded for a key that does not exist.
const ABSENT_VERSION: u64 = 0;

#[derive(Debug, Clone)]
struct Versioned {
    value: Vec<u8>,
    /// Commit version that last wrote this key.
    version: u64,
}

#[derive(Debug, Default)]
struct Inner {
    data: BTreeMap<Vec<u8>, Versioned>,
    /// Last assigned commit version.
    commit_version: u64,
}

impl Inner {
    fn version_of(&self, key: &[u8]) -> u64 {
        self.data.get(key).map(|v| v.version).unwrap_or(ABSENT_VERSION)
    }
}

/// In-memory deterministic implementation of [`KvStore`].
///
/// Cloning shares the underlying map, so several handles can open competing
/// transactions against the same data.
///
/// # Example
///
/// ```
/// use tessera_kv::{KvStore, MemoryStore, Transaction};
///
/// let store = MemoryStore::new();
/// let mut txn = store.begin().unwrap();
/// txn.set(b"k", b"v").unwrap();
/// txn.commit().unwrap();
///
/// let txn = store.begin().unwrap();
/// assert_eq!(txn.get(b"k").unwrap(), b"v");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    /// Create a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of committed keys.
    pub fn len(&self) -> usize {
        self.inner.read().data.len()
    }

    /// Whether the store holds no committed keys.
    pub fn is_empty(&self) -> bool {
        self.inner.read().data.is_empty()
    }

    /// Committed keys starting with `prefix`, in order.
    pub fn keys_with_prefix(&self, prefix: &[u8]) -> Vec<Vec<u8>> {
        let inner = self.inner.read();
        inner
            .data
            .range::<[u8], _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, _)| k.clone())
            .collect()
    }
}

impl KvStore for MemoryStore {
    type Txn = MemoryTransaction;

    fn begin(&self) -> Result<MemoryTransaction, KvError> {
        Ok(MemoryTransaction {
            store: Arc::clone(&self.inner),
            writes: BTreeMap::new(),
            reads: RefCell::new(HashMap::new()),
        })
    }
}

/// Transaction over a [`MemoryStore`].
///
/// Reads see this transaction's own uncommitted writes. Dropping the
/// transaction without committing discards its writes.
#[derive(Debug)]
pub struct MemoryTransaction {
    store: Arc<RwLock<Inner>>,
    /// Buffered writes; `None` marks a delete.
    writes: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
    /// Versions observed by reads, validated on commit.
    reads: RefCell<HashMap<Vec<u8>, u64>>,
}

impl MemoryTransaction {
    fn record_read(&self, key: &[u8], version: u64) {
        self.reads.borrow_mut().entry(key.to_vec()).or_insert(version);
    }
}

impl Transaction for MemoryTransaction {
    fn get(&self, key: &[u8]) -> Result<Vec<u8>, KvError> {
        if let Some(buffered) = self.writes.get(key) {
            return buffered.clone().ok_or_else(|| KvError::NotFound { key: key.to_vec() });
        }

        let inner = self.store.read();
        match inner.data.get(key) {
            Some(entry) => {
                self.record_read(key, entry.version);
                Ok(entry.value.clone())
            }
            None => {
                self.record_read(key, ABSENT_VERSION);
                Err(KvError::NotFound { key: key.to_vec() })
            }
        }
    }

    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<(), KvError> {
        check_write(key, value)?;
        self.writes.insert(key.to_vec(), Some(value.to_vec()));
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), KvError> {
        check_key(key)?;
        self.writes.insert(key.to_vec(), None);
        Ok(())
    }

    fn seek(&self, lower: Bound<&[u8]>, upper: Option<&[u8]>) -> Result<Option<KeyValue>, KvError> {
        if is_empty_range(lower, upper) {
            return Ok(None);
        }
        let upper_bound = upper.map_or(Bound::Unbounded, Bound::Excluded);

        // First live buffered write in range.
        let buffered = self
            .writes
            .range::<[u8], _>((lower, upper_bound))
            .find_map(|(k, v)| v.as_ref().map(|v| (k, v)));

        // First committed key in range that this transaction has not overwritten.
        let inner = self.store.read();
        let committed = inner
            .data
            .range::<[u8], _>((lower, upper_bound))
            .find(|(k, _)| !self.writes.contains_key(k.as_slice()));

        let found = match (buffered, committed) {
            (Some((bk, bv)), Some((ck, _))) if bk <= ck => Some(KeyValue {
                key: bk.clone(),
                value: bv.clone(),
            }),
            (_, Some((ck, entry))) => {
                self.record_read(ck, entry.version);
                Some(KeyValue {
                    key: ck.clone(),
                    value: entry.value.clone(),
                })
            }
            (Some((bk, bv)), None) => Some(KeyValue {
                key: bk.clone(),
                value: bv.clone(),
            }),
            (None, None) => None,
        };
        Ok(found)
    }

    fn commit(self) -> Result<(), KvError> {
        let mut inner = self.store.write();

        for (key, observed) in self.reads.borrow().iter() {
            if inner.version_of(key) != *observed {
                debug!(key = %key.escape_ascii(), "optimistic commit rejected");
                return Err(KvError::Conflict { key: key.clone() });
            }
        }

        if self.writes.is_empty() {
            return Ok(());
        }

        inner.commit_version = inner.commit_version.saturating_add(1);
        let version = inner.commit_version;
        let writes = self.writes.len();
        for (key, value) in self.writes {
            match value {
                Some(value) => {
                    inner.data.insert(key, Versioned { value, version });
                }
                None => {
                    inner.data.remove(&key);
                }
            }
        }
        trace!(version, writes, "memory transaction committed");
        Ok(())
    }

    fn rollback(self) -> Result<(), KvError> {
        trace!(writes = self.writes.len(), "memory transaction rolled back");
        Ok(())
    }
}
