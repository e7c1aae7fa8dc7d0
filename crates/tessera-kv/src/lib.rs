//! Ordered, transactional key-value store abstraction.
//!
//! This crate defines the narrow interface that data-structure layers are
//! written against, plus two backends:
//!
//! - **Traits**: [`KvStore`] hands out [`Transaction`]s; a transaction offers point
//!   reads, batch reads, writes, deletes and ordered range seeks
//! - **Cursor**: [`KvIter`], a forward cursor that tolerates deleting the current key
//! - **Backends**: [`MemoryStore`] (optimistic, in-memory, for tests) and [`RedbStore`]
//!   (persistent, redb), plus [`Store`] to choose between them at runtime
//! - **Retry**: [`transact`], the caller-side commit loop with bounded retries
//! - **Constants**: Tiger Style resource limits
//!
//! # Example
//!
//! ```
//! use tessera_kv::{transact, KvError, KvStore, MemoryStore, Transaction};
//!
//! let store = MemoryStore::new();
//! transact(&store, 3, |txn| -> Result<(), KvError> {
//!     txn.set(b"users:alice", b"1")?;
//!     txn.set(b"users:bob", b"1")?;
//!     Ok(())
//! })
//! .unwrap();
//!
//! let txn = store.begin().unwrap();
//! let mut iter = txn.iter(b"users:", None).unwrap();
//! assert_eq!(iter.key(), b"users:alice");
//! iter.next(&txn).unwrap();
//! assert_eq!(iter.key(), b"users:bob");
//! ```

mod backend;
pub mod constants;
mod cursor;
mod error;
mod inmemory;
mod redb_store;
mod retry;
mod traits;
pub mod validation;

pub use backend::Store;
pub use backend::StoreTransaction;
pub use constants::MAX_BATCH_KEYS;
pub use constants::MAX_KEY_SIZE;
pub use constants::MAX_TXN_RETRIES;
pub use constants::MAX_VALUE_SIZE;
pub use cursor::KvIter;
pub use cursor::prefix_next;
pub use error::KvError;
pub use inmemory::MemoryStore;
pub use inmemory::MemoryTransaction;
pub use redb_store::RedbStore;
pub use redb_store::RedbTransaction;
pub use retry::transact;
pub use traits::KeyValue;
pub use traits::KvStore;
pub use traits::Transaction;

#[cfg(test)]
mod proptest;
