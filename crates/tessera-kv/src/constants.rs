//! Fixed resource bounds for the key-value layer.
//!
//! Tiger Style: Constants are fixed and immutable, enforced at compile time.
//! Each constant has explicit bounds to prevent unbounded resource allocation.

// ============================================================================
// Key-Value Size Limits
// ============================================================================

/// Maximum size of a single key in bytes (4 KB).
///
/// Member keys carry the namespace, database id, object id and the raw member
/// bytes, so this bounds the largest storable set member as well.
pub const MAX_KEY_SIZE: u32 = 4 * 1024;

/// Maximum size of a single value in bytes (1 MB).
pub const MAX_VALUE_SIZE: u32 = 1024 * 1024;

/// Maximum number of keys accepted by a single `batch_get`.
pub const MAX_BATCH_KEYS: u32 = 10_000;

// ============================================================================
// Transaction Retry
// ============================================================================

/// Maximum attempts for an optimistic transaction before giving up.
pub const MAX_TXN_RETRIES: u32 = 16;

/// Initial backoff between conflicting transaction attempts.
pub const TXN_RETRY_INITIAL_BACKOFF_MS: u64 = 1;

/// Upper bound on the backoff between conflicting transaction attempts.
pub const TXN_RETRY_MAX_BACKOFF_MS: u64 = 128;
