//! Forward range cursor over a [`Transaction`].

use std::ops::Bound;

use crate::error::KvError;
use crate::traits::KeyValue;
use crate::traits::Transaction;

/// A restartable, finite, forward-only cursor over `[start, end)`.
///
/// The cursor holds only its current entry and the exclusive end key. Each
/// [`KvIter::next`] re-seeks strictly after the current key, so deleting the
/// current key through the same transaction before advancing is safe on every
/// backend.
#[derive(Debug, Clone)]
pub struct KvIter {
    end: Option<Vec<u8>>,
    current: Option<KeyValue>,
}

impl KvIter {
    /// Position a cursor at the first entry `>= start` and `< end`.
    pub fn open<T: Transaction + ?Sized>(txn: &T, start: &[u8], end: Option<&[u8]>) -> Result<Self, KvError> {
        let current = txn.seek(Bound::Included(start), end)?;
        Ok(Self {
            end: end.map(<[u8]>::to_vec),
            current,
        })
    }

    /// Whether the cursor points at an entry.
    pub fn valid(&self) -> bool {
        self.current.is_some()
    }

    /// Key of the current entry, or an empty slice when exhausted.
    pub fn key(&self) -> &[u8] {
        self.current.as_ref().map(|kv| kv.key.as_slice()).unwrap_or_default()
    }

    /// Value of the current entry, or an empty slice when exhausted.
    pub fn value(&self) -> &[u8] {
        self.current.as_ref().map(|kv| kv.value.as_slice()).unwrap_or_default()
    }

    /// Advance to the next entry after the current key.
    ///
    /// Advancing an exhausted cursor is a no-op.
    pub fn next<T: Transaction + ?Sized>(&mut self, txn: &T) -> Result<(), KvError> {
        if let Some(current) = self.current.take() {
            self.current = txn.seek(Bound::Excluded(current.key.as_slice()), self.end.as_deref())?;
        }
        Ok(())
    }
}

/// Compute the strict upper bound for every key with the given prefix
/// (FoundationDB `strinc`).
///
/// Returns `None` when the prefix is empty or all `0xFF`; such a prefix has no
/// finite exclusive upper bound.
pub fn prefix_next(prefix: &[u8]) -> Option<Vec<u8>> {
    let last = prefix.iter().rposition(|&b| b != 0xFF)?;
    let mut end = prefix[..=last].to_vec();
    end[last] += 1;
    Some(end)
}

/// Whether `(lower, upper)` can contain no key at all.
///
/// `BTreeMap::range` panics on inverted bounds, so backends check this first.
pub(crate) fn is_empty_range(lower: Bound<&[u8]>, upper: Option<&[u8]>) -> bool {
    match (lower, upper) {
        (Bound::Included(l), Some(u)) | (Bound::Excluded(l), Some(u)) => l >= u,
        _ => false,
    }
}
