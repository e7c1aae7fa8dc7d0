//! Forward cursor over the members of one set.

use snafu::ResultExt;
use tessera_kv::KvIter;
use tessera_kv::Transaction;
use tessera_kv::prefix_next;

use crate::error::Result;
use crate::error::StorageSnafu;

/// Cursor over one set's member keys, in byte-lexicographic member order.
///
/// Bounded by `[prefix, prefix_next(prefix))`, so it never reads into a
/// sibling object's keys. The cursor does not borrow the transaction between
/// steps: the caller may delete the current member before calling
/// [`MemberIter::next`].
#[derive(Debug, Clone)]
pub struct MemberIter {
    inner: KvIter,
    prefix: Vec<u8>,
}

impl MemberIter {
    /// Open a cursor over every key that starts with `prefix`.
    pub fn open<T: Transaction + ?Sized>(txn: &T, prefix: Vec<u8>) -> Result<Self> {
        let end = prefix_next(&prefix);
        let inner = txn.iter(&prefix, end.as_deref()).context(StorageSnafu)?;
        Ok(Self { inner, prefix })
    }

    /// Whether the cursor points at a key that still has the exact prefix.
    pub fn valid(&self) -> bool {
        self.inner.valid() && self.inner.key().starts_with(&self.prefix)
    }

    /// Current member, the key with the prefix stripped.
    ///
    /// Empty once the cursor is exhausted.
    pub fn value(&self) -> &[u8] {
        if !self.valid() {
            return &[];
        }
        &self.inner.key()[self.prefix.len()..]
    }

    /// Full store key of the current member.
    pub fn key(&self) -> &[u8] {
        self.inner.key()
    }

    /// Advance to the next member.
    pub fn next<T: Transaction + ?Sized>(&mut self, txn: &T) -> Result<()> {
        self.inner.next(txn).context(StorageSnafu)
    }
}

#[cfg(test)]
mod tests {
    use tessera_kv::KvStore;
    use tessera_kv::MemoryStore;

    use super::*;

    fn collect<T: Transaction>(txn: &T, prefix: &[u8]) -> Vec<Vec<u8>> {
        let mut iter = MemberIter::open(txn, prefix.to_vec()).unwrap();
        let mut out = Vec::new();
        while iter.valid() {
            out.push(iter.value().to_vec());
            iter.next(txn).unwrap();
        }
        out
    }

    #[test]
    fn test_iter_stays_inside_prefix() {
        let store = MemoryStore::new();
        let mut txn = store.begin().unwrap();
        for key in [b"d:1:a".as_slice(), b"d:1:b", b"d:1;", b"d:10:a", b"d:0:z"] {
            txn.set(key, b"\x00").unwrap();
        }

        assert_eq!(collect(&txn, b"d:1:"), vec![b"a".to_vec(), b"b".to_vec()]);
        assert_eq!(collect(&txn, b"d:10:"), vec![b"a".to_vec()]);
        assert!(collect(&txn, b"d:2:").is_empty());
    }

    #[test]
    fn test_exhausted_iter_yields_empty_value() {
        let store = MemoryStore::new();
        let txn = store.begin().unwrap();
        let mut iter = MemberIter::open(&txn, b"p:".to_vec()).unwrap();
        assert!(!iter.valid());
        assert_eq!(iter.value(), b"");
        iter.next(&txn).unwrap();
        assert!(!iter.valid());
    }

    #[test]
    fn test_delete_current_while_iterating() {
        let store = MemoryStore::new();
        let mut txn = store.begin().unwrap();
        for member in ["a", "b", "c"] {
            txn.set(format!("p:{member}").as_bytes(), b"\x00").unwrap();
        }

        let mut iter = MemberIter::open(&txn, b"p:".to_vec()).unwrap();
        let mut seen = Vec::new();
        while iter.valid() {
            seen.push(iter.value().to_vec());
            let key = iter.key().to_vec();
            txn.delete(&key).unwrap();
            iter.next(&txn).unwrap();
        }

        assert_eq!(seen, vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]);
        assert!(collect(&txn, b"p:").is_empty());
    }
}
