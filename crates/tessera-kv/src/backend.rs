//! Runtime choice between the in-memory and redb backends.
//!
//! [`Store`] lets a deployment pick its backend from configuration while the
//! layers above stay generic over [`KvStore`].

use std::ops::Bound;
use std::path::Path;

use tracing::debug;

use crate::error::KvError;
use crate::inmemory::MemoryStore;
use crate::inmemory::MemoryTransaction;
use crate::redb_store::RedbStore;
use crate::redb_store::RedbTransaction;
use crate::traits::KeyValue;
use crate::traits::KvStore;
use crate::traits::Transaction;

/// A store whose backend is selected at runtime.
#[derive(Clone)]
pub enum Store {
    /// Volatile [`MemoryStore`]. Data is lost when the last clone is dropped.
    Memory(MemoryStore),
    /// Persistent [`RedbStore`].
    Redb(RedbStore),
}

impl Store {
    /// Open a redb store at `path`, or an in-memory store when `path` is `None`.
    pub fn open(path: Option<&Path>) -> Result<Self, KvError> {
        match path {
            Some(path) => {
                debug!(path = %path.display(), backend = "redb", "opening store");
                Ok(Self::Redb(RedbStore::create(path)?))
            }
            None => {
                debug!(backend = "memory", "opening store");
                Ok(Self::Memory(MemoryStore::new()))
            }
        }
    }

    /// Short backend name for logs.
    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Redb(_) => "redb",
        }
    }
}

impl KvStore for Store {
    type Txn = StoreTransaction;

    fn begin(&self) -> Result<StoreTransaction, KvError> {
        match self {
            Self::Memory(store) => store.begin().map(StoreTransaction::Memory),
            Self::Redb(store) => store.begin().map(StoreTransaction::Redb),
        }
    }
}

/// Transaction over a [`Store`], delegating to the selected backend.
pub enum StoreTransaction {
    Memory(MemoryTransaction),
    Redb(RedbTransaction),
}

impl Transaction for StoreTransaction {
    fn get(&self, key: &[u8]) -> Result<Vec<u8>, KvError> {
        match self {
            Self::Memory(txn) => txn.get(key),
            Self::Redb(txn) => txn.get(key),
        }
    }

    fn batch_get(&self, keys: &[Vec<u8>]) -> Result<Vec<Option<Vec<u8>>>, KvError> {
        match self {
            Self::Memory(txn) => txn.batch_get(keys),
            Self::Redb(txn) => txn.batch_get(keys),
        }
    }

    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<(), KvError> {
        match self {
            Self::Memory(txn) => txn.set(key, value),
            Self::Redb(txn) => txn.set(key, value),
        }
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), KvError> {
        match self {
            Self::Memory(txn) => txn.delete(key),
            Self::Redb(txn) => txn.delete(key),
        }
    }

    fn seek(&self, lower: Bound<&[u8]>, upper: Option<&[u8]>) -> Result<Option<KeyValue>, KvError> {
        match self {
            Self::Memory(txn) => txn.seek(lower, upper),
            Self::Redb(txn) => txn.seek(lower, upper),
        }
    }

    fn commit(self) -> Result<(), KvError> {
        match self {
            Self::Memory(txn) => txn.commit(),
            Self::Redb(txn) => txn.commit(),
        }
    }

    fn rollback(self) -> Result<(), KvError> {
        match self {
            Self::Memory(txn) => txn.rollback(),
            Self::Redb(txn) => txn.rollback(),
        }
    }
}
