//! Store and transaction traits consumed by data-structure layers.

use std::ops::Bound;

use crate::cursor::KvIter;
use crate::error::KvError;
use crate::validation::check_batch;

/// A key/value pair returned by a range read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    /// The full store key.
    pub key: Vec<u8>,
    /// The stored value.
    pub value: Vec<u8>,
}

/// An open, single-owner transaction over an ordered byte-string key space.
///
/// Every read and write issued through one `Transaction` belongs to the same
/// atomic unit. Layers built on top of this trait never begin, commit or roll
/// back; that belongs to whoever created the transaction.
///
/// Range reads are expressed through [`Transaction::seek`], which returns the
/// first entry after a lower bound. [`KvIter`] builds a forward cursor on top
/// of it without holding a borrow of the transaction between steps, so the
/// caller may delete the current key while iterating.
pub trait Transaction {
    /// Read a single key.
    ///
    /// Returns [`KvError::NotFound`] when the key is absent.
    fn get(&self, key: &[u8]) -> Result<Vec<u8>, KvError>;

    /// Read many keys in one round trip.
    ///
    /// The result has one slot per requested key, `None` for absent keys.
    /// Any error other than absence fails the whole batch.
    fn batch_get(&self, keys: &[Vec<u8>]) -> Result<Vec<Option<Vec<u8>>>, KvError> {
        check_batch(keys.len())?;
        keys.iter()
            .map(|key| match self.get(key) {
                Ok(value) => Ok(Some(value)),
                Err(KvError::NotFound { .. }) => Ok(None),
                Err(e) => Err(e),
            })
            .collect()
    }

    /// Write a key. Values must be non-empty.
    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<(), KvError>;

    /// Delete a key. Deleting an absent key is not an error.
    fn delete(&mut self, key: &[u8]) -> Result<(), KvError>;

    /// Return the first entry with `lower` < key (or <=, per the bound) and
    /// key < `upper`, in byte-lexicographic order. `upper = None` is unbounded.
    fn seek(&self, lower: Bound<&[u8]>, upper: Option<&[u8]>) -> Result<Option<KeyValue>, KvError>;

    /// Open a forward cursor over `[start, end)`.
    fn iter(&self, start: &[u8], end: Option<&[u8]>) -> Result<KvIter, KvError> {
        KvIter::open(self, start, end)
    }

    /// Make all writes of this transaction durable and visible.
    fn commit(self) -> Result<(), KvError>
    where
        Self: Sized;

    /// Discard all writes of this transaction.
    fn rollback(self) -> Result<(), KvError>
    where
        Self: Sized;
}

/// A store that hands out transactions.
pub trait KvStore {
    /// Transaction type produced by [`KvStore::begin`].
    type Txn: Transaction;

    /// Begin a new read-write transaction.
    fn begin(&self) -> Result<Self::Txn, KvError>;
}
