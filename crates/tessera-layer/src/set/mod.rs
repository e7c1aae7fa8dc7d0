//! Unordered set of byte-string members over a caller-owned transaction.
//!
//! A set is stored as one metadata record plus one key per member:
//!
//! ```text
//! {ns}:{db}:M:{logical_key}          -> object header | len (8 BE)
//! {ns}:{db}:D:{object_id}:{member}   -> 0x00
//! ```
//!
//! Membership is a point read, cardinality is read from the metadata, and
//! enumeration is a range scan over the object's data prefix. Every mutation
//! rewrites the metadata in the same transaction as the member keys, so the
//! stored `len` always matches the member keys once the caller commits.
//!
//! This module never begins, commits or rolls back a transaction.
//!
//! # Example
//!
//! ```
//! use tessera_kv::{KvStore, MemoryStore, Transaction};
//! use tessera_layer::{KeySpace, SetHandle, SystemClock};
//!
//! let store = MemoryStore::new();
//! let keys = KeySpace::default();
//!
//! let mut txn = store.begin().unwrap();
//! let mut set = SetHandle::load(&mut txn, &keys, &SystemClock, b"fruits").unwrap();
//! assert_eq!(set.sadd(&["apple", "pear", "apple"]).unwrap(), 2);
//! assert_eq!(set.smembers().unwrap(), vec![b"apple".to_vec(), b"pear".to_vec()]);
//! txn.commit().unwrap();
//! ```

mod iter;
mod member;
mod meta;
#[cfg(test)]
mod proptest;

use snafu::ResultExt;
use tessera_kv::MAX_BATCH_KEYS;
use tessera_kv::Transaction;
use tracing::debug;
use tracing::trace;
use tracing::warn;

use crate::clock::IdGenerator;
use crate::clock::TimeProvider;
use crate::error::CorruptSentinelSnafu;
use crate::error::Result;
use crate::error::StorageSnafu;
use crate::error::TypeMismatchSnafu;
use crate::error::display_bytes;
use crate::keys::KeySpace;
use crate::object::ObjectEncoding;
use crate::object::ObjectHeader;
use crate::object::ObjectType;
use crate::object::is_expired;

pub use iter::MemberIter;
pub use member::SENTINEL_VALUE;
pub use member::dedup_members;
pub use member::member_key;
pub use member::member_prefix;
pub use meta::SET_META_LEN;
pub use meta::SetMeta;

/// Upper bound on up-front allocation when enumerating members.
///
/// `len` comes from storage; a corrupt value must not drive allocation.
const MEMBERS_PREALLOC_LIMIT: usize = 1024;

/// Handle to one set, bound to a transaction for its whole lifetime.
///
/// Obtained with [`SetHandle::load`], which never writes. The metadata record
/// is created by the first mutation that persists it.
pub struct SetHandle<'a, T: ?Sized, C> {
    txn: &'a mut T,
    keys: &'a KeySpace,
    clock: &'a C,
    key: Vec<u8>,
    meta: SetMeta,
    exists: bool,
}

impl<'a, T, C> SetHandle<'a, T, C>
where
    T: Transaction + ?Sized,
    C: TimeProvider + IdGenerator,
{
    /// Load the set stored at `key`, or prepare a new one.
    ///
    /// A missing or expired record yields a handle with `exists() == false`
    /// and a fresh object identifier. A record of another type fails with
    /// [`TypeMismatch`](crate::LayerError::TypeMismatch); a malformed record
    /// fails with [`InvalidLength`](crate::LayerError::InvalidLength) or
    /// [`InvalidObject`](crate::LayerError::InvalidObject).
    pub fn load(txn: &'a mut T, keys: &'a KeySpace, clock: &'a C, key: &[u8]) -> Result<Self> {
        let raw = match txn.get(&keys.meta_key(key)) {
            Ok(raw) => raw,
            Err(e) if e.is_not_found() => {
                trace!(key = %display_bytes(key), "set not found, preparing new object");
                return Ok(Self::fresh(txn, keys, clock, key));
            }
            Err(e) => return Err(e).context(StorageSnafu),
        };

        let meta = SetMeta::decode(&raw)?;
        if meta.header.object_type != ObjectType::Set {
            return TypeMismatchSnafu {
                key,
                found: meta.header.object_type,
            }
            .fail();
        }

        if is_expired(&meta.header, clock.now_unix_ms()) {
            debug!(
                key = %display_bytes(key),
                expire_at_ms = meta.header.expire_at_ms,
                "set expired, treating as absent"
            );
            return Ok(Self::fresh(txn, keys, clock, key));
        }

        Ok(Self {
            txn,
            keys,
            clock,
            key: key.to_vec(),
            meta,
            exists: true,
        })
    }

    fn fresh(txn: &'a mut T, keys: &'a KeySpace, clock: &'a C, key: &[u8]) -> Self {
        let now = clock.now_unix_ms();
        let meta = SetMeta {
            header: ObjectHeader {
                id: clock.new_object_id(),
                object_type: ObjectType::Set,
                encoding: ObjectEncoding::HashTable,
                created_at_ms: now,
                updated_at_ms: now,
                expire_at_ms: 0,
            },
            len: 0,
        };
        Self {
            txn,
            keys,
            clock,
            key: key.to_vec(),
            meta,
            exists: false,
        }
    }

    /// Whether a live metadata record backs this handle.
    pub fn exists(&self) -> bool {
        self.exists
    }

    /// Logical key of the set.
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// Current metadata, including any unpersisted fresh identity.
    pub fn meta(&self) -> &SetMeta {
        &self.meta
    }

    /// Add members, returning how many were not already present.
    ///
    /// Duplicates in `members` count once. Creates the set if needed. Presence
    /// is read in batches of at most [`MAX_BATCH_KEYS`] keys.
    pub fn sadd<M: AsRef<[u8]>>(&mut self, members: &[M]) -> Result<u64> {
        let data_prefix = self.data_prefix();
        let member_keys: Vec<Vec<u8>> =
            dedup_members(members).into_iter().map(|member| member_key(&data_prefix, member)).collect();

        let mut added: u64 = 0;
        for chunk in member_keys.chunks(MAX_BATCH_KEYS as usize) {
            let existing = self.txn.batch_get(chunk).context(StorageSnafu)?;
            added += existing.iter().filter(|value| value.is_none()).count() as u64;
        }

        for member_key in &member_keys {
            self.txn.set(member_key, SENTINEL_VALUE).context(StorageSnafu)?;
        }

        self.meta.len = self.meta.len.saturating_add(added);
        self.update_meta()?;

        debug!(key = %display_bytes(&self.key), added, len = self.meta.len, "sadd");
        Ok(added)
    }

    /// Whether `member` belongs to the set.
    ///
    /// Fails with [`CorruptSentinel`](crate::LayerError::CorruptSentinel) if
    /// the member key holds anything but the sentinel byte.
    pub fn sismember(&self, member: &[u8]) -> Result<bool> {
        if !self.exists {
            return Ok(false);
        }

        let member_key = member_key(&self.data_prefix(), member);
        match self.txn.get(&member_key) {
            Ok(value) if value == SENTINEL_VALUE => Ok(true),
            Ok(_) => {
                warn!(key = %display_bytes(&member_key), "member key holds non-sentinel value");
                CorruptSentinelSnafu { key: member_key }.fail()
            }
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e).context(StorageSnafu),
        }
    }

    /// Number of members; 0 for a missing set.
    pub fn scard(&self) -> u64 {
        if !self.exists {
            return 0;
        }
        self.meta.len
    }

    /// All members in byte-lexicographic order.
    ///
    /// Reads at most `len` entries, trusting the stored cardinality.
    pub fn smembers(&self) -> Result<Vec<Vec<u8>>> {
        if !self.exists {
            return Ok(Vec::new());
        }

        let mut remaining = self.meta.len;
        let capacity = usize::try_from(remaining).unwrap_or(usize::MAX).min(MEMBERS_PREALLOC_LIMIT);
        let mut members = Vec::with_capacity(capacity);

        let mut iter = self.iter()?;
        while iter.valid() && remaining > 0 {
            members.push(iter.value().to_vec());
            iter.next(&*self.txn)?;
            remaining -= 1;
        }

        trace!(key = %display_bytes(&self.key), count = members.len(), "smembers");
        Ok(members)
    }

    /// Cursor over the set's member keys.
    pub fn iter(&self) -> Result<MemberIter> {
        MemberIter::open(&*self.txn, member_prefix(&self.data_prefix()))
    }

    /// Remove members, returning how many were present.
    ///
    /// Stops at the first member key holding a non-sentinel value. Metadata
    /// is rewritten even when nothing was removed.
    pub fn srem<M: AsRef<[u8]>>(&mut self, members: &[M]) -> Result<u64> {
        if !self.exists {
            return Ok(0);
        }

        let data_prefix = self.data_prefix();
        let mut removed = 0u64;
        for member in dedup_members(members) {
            let member_key = member_key(&data_prefix, member);
            match self.txn.get(&member_key) {
                Ok(value) if value == SENTINEL_VALUE => {
                    self.txn.delete(&member_key).context(StorageSnafu)?;
                    removed += 1;
                }
                Ok(_) => {
                    warn!(key = %display_bytes(&member_key), "member key holds non-sentinel value");
                    return CorruptSentinelSnafu { key: member_key }.fail();
                }
                Err(e) if e.is_not_found() => continue,
                Err(e) => return Err(e).context(StorageSnafu),
            }
        }

        self.meta.len = self.meta.len.saturating_sub(removed);
        self.update_meta()?;

        debug!(key = %display_bytes(&self.key), removed, len = self.meta.len, "srem");
        Ok(removed)
    }

    /// Remove and return up to `count` members.
    ///
    /// Members are taken in byte-lexicographic order, not sampled.
    pub fn spop(&mut self, count: u64) -> Result<Vec<Vec<u8>>> {
        if !self.exists || self.meta.len == 0 {
            return Ok(Vec::new());
        }

        let mut budget = count;
        let mut popped = Vec::new();
        let mut iter = self.iter()?;
        while iter.valid() && budget > 0 {
            popped.push(iter.value().to_vec());
            self.txn.delete(iter.key()).context(StorageSnafu)?;
            budget -= 1;
            iter.next(&*self.txn)?;
        }

        self.meta.len = self.meta.len.saturating_sub(popped.len() as u64);
        self.update_meta()?;

        debug!(key = %display_bytes(&self.key), popped = popped.len(), len = self.meta.len, "spop");
        Ok(popped)
    }

    /// Move `member` from this set to the set at `destination`.
    ///
    /// Returns `false` if this set does not contain `member`. Both sets change
    /// inside the same transaction. Moving to the same logical key is a no-op.
    pub fn smove(&mut self, destination: &[u8], member: &[u8]) -> Result<bool> {
        if !self.exists || !self.sismember(member)? {
            return Ok(false);
        }

        if destination == self.key.as_slice() {
            return Ok(true);
        }

        {
            let mut dest = SetHandle::load(&mut *self.txn, self.keys, self.clock, destination)?;
            if !dest.sismember(member)? {
                dest.sadd(&[member])?;
            }
        }

        let member_key = member_key(&self.data_prefix(), member);
        self.txn.delete(&member_key).context(StorageSnafu)?;
        self.meta.len = self.meta.len.saturating_sub(1);
        self.update_meta()?;

        debug!(
            source = %display_bytes(&self.key),
            destination = %display_bytes(destination),
            "smove"
        );
        Ok(true)
    }

    fn data_prefix(&self) -> Vec<u8> {
        self.keys.data_prefix(&self.meta.header.id)
    }

    /// Stamp and persist the metadata record.
    fn update_meta(&mut self) -> Result<()> {
        self.meta.header.updated_at_ms = self.clock.now_unix_ms();
        let meta_key = self.keys.meta_key(&self.key);
        self.txn.set(&meta_key, &self.meta.encode()).context(StorageSnafu)?;
        self.exists = true;
        Ok(())
    }
}

impl<T: ?Sized, C> std::fmt::Debug for SetHandle<'_, T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SetHandle")
            .field("key", &display_bytes(&self.key))
            .field("meta", &self.meta)
            .field("exists", &self.exists)
            .finish_non_exhaustive()
    }
}
