//! Injectable wall clock and object identity sources.
//!
//! Layers read the current time when stamping metadata and checking
//! expiration, and draw a fresh identifier whenever a new object instance is
//! created. Both are traits so tests can pin time and identifiers.
//!
//! # Tiger Style
//!
//! - No `.expect()` or `.unwrap()`: a clock before the Unix epoch reads as 0
//! - Identifiers are fixed 16-byte arrays, never heap allocated

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use uuid::Uuid;

use crate::object::OBJECT_ID_LEN;
use crate::object::ObjectId;

/// Source of the current wall-clock time.
pub trait TimeProvider: Send + Sync {
    /// Current Unix timestamp in milliseconds.
    fn now_unix_ms(&self) -> u64;
}

/// Source of globally unique object identifiers.
pub trait IdGenerator: Send + Sync {
    /// Generate an identifier never returned before.
    fn new_object_id(&self) -> ObjectId;
}

// ============================================================================
// SystemClock (Production)
// ============================================================================

/// System clock paired with random UUID v4 identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl TimeProvider for SystemClock {
    #[inline]
    fn now_unix_ms(&self) -> u64 {
        SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis() as u64).unwrap_or(0)
    }
}

impl IdGenerator for SystemClock {
    #[inline]
    fn new_object_id(&self) -> ObjectId {
        Uuid::new_v4().into_bytes()
    }
}

// ============================================================================
// ManualClock (Testing)
// ============================================================================

/// Deterministic clock and identifier source.
///
/// Time only moves when told to. Identifiers are a big-endian counter in the
/// low eight bytes, so successive objects sort in creation order.
///
/// # Example
///
/// ```
/// use tessera_layer::{IdGenerator, ManualClock, TimeProvider};
///
/// let clock = ManualClock::new(1_000);
/// assert_eq!(clock.now_unix_ms(), 1_000);
///
/// clock.advance_ms(500);
/// assert_eq!(clock.now_unix_ms(), 1_500);
///
/// assert!(clock.new_object_id() < clock.new_object_id());
/// ```
#[derive(Debug)]
pub struct ManualClock {
    now_ms: AtomicU64,
    next_id: AtomicU64,
}

impl ManualClock {
    /// Create a clock reading `initial_ms`.
    pub fn new(initial_ms: u64) -> Self {
        Self {
            now_ms: AtomicU64::new(initial_ms),
            next_id: AtomicU64::new(1),
        }
    }

    /// Move time forward.
    pub fn advance_ms(&self, delta_ms: u64) {
        self.now_ms.fetch_add(delta_ms, Ordering::SeqCst);
    }

    /// Jump to an absolute time.
    pub fn set_ms(&self, time_ms: u64) {
        self.now_ms.store(time_ms, Ordering::SeqCst);
    }
}

impl TimeProvider for ManualClock {
    #[inline]
    fn now_unix_ms(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

impl IdGenerator for ManualClock {
    fn new_object_id(&self) -> ObjectId {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut id = [0u8; OBJECT_ID_LEN];
        id[OBJECT_ID_LEN - 8..].copy_from_slice(&n.to_be_bytes());
        id
    }
}
