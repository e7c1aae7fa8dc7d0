//! Tessera: collection layers over an ordered transactional key-value store.
//!
//! This crate re-exports the two workspace crates and adds process-level glue:
//!
//! - [`kv`]: the [`Transaction`](kv::Transaction) abstraction with in-memory and
//!   redb backends, plus the [`transact`](kv::transact) retry runner
//! - [`layer`]: the set data type and its supporting codecs
//! - [`load_config`] and [`open_store`]: configuration resolution and backend selection
//! - [`init_tracing`]: log subscriber bootstrap for binaries and tests
//!
//! # Example
//!
//! ```
//! use tessera::kv::{transact, MemoryStore};
//! use tessera::layer::{KeySpace, LayerError, SetHandle, SystemClock};
//!
//! let store = MemoryStore::new();
//! let keys = KeySpace::default();
//!
//! let added = transact(&store, 3, |txn| -> Result<u64, LayerError> {
//!     SetHandle::load(txn, &keys, &SystemClock, b"tags")?.sadd(&["rust", "kv"])
//! })
//! .unwrap();
//! assert_eq!(added, 2);
//! ```

mod bootstrap;

pub use bootstrap::load_config;
pub use bootstrap::open_store;
pub use tessera_kv as kv;
pub use tessera_layer as layer;
use tracing_subscriber::EnvFilter;

/// Initialize a `fmt` subscriber filtered by `RUST_LOG`, or by `default_filter`
/// when `RUST_LOG` is unset or invalid.
///
/// Returns `false` if a global subscriber was already installed, which makes
/// repeated calls from tests harmless.
pub fn init_tracing(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).compact().try_init().is_ok()
}
