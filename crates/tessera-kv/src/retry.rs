//! Caller-side transaction runner with bounded optimistic retry.
//!
//! Data-structure layers operate inside a transaction they neither open nor
//! commit. This helper is the other half: it owns the transaction boundary,
//! runs a closure against a fresh transaction, commits, and re-runs the
//! closure when the commit reports a conflict.

use std::thread;
use std::time::Duration;

use tracing::debug;
use tracing::warn;

use crate::constants::TXN_RETRY_INITIAL_BACKOFF_MS;
use crate::constants::TXN_RETRY_MAX_BACKOFF_MS;
use crate::error::KvError;
use crate::traits::KvStore;
use crate::traits::Transaction;

/// Run `f` in a transaction on `store`, committing on success.
///
/// - `f` returning `Err` rolls the transaction back and returns the error
///   without retrying.
/// - A commit that fails with [`KvError::Conflict`] is retried with
///   exponential backoff, up to `max_attempts` total attempts.
/// - Any other commit error is returned immediately.
pub fn transact<S, F, R, E>(store: &S, max_attempts: u32, mut f: F) -> Result<R, E>
where
    S: KvStore,
    F: FnMut(&mut S::Txn) -> Result<R, E>,
    E: From<KvError>,
{
    assert!(max_attempts > 0, "TRANSACT: max_attempts must be positive");

    let mut attempt = 0u32;
    let mut backoff_ms = TXN_RETRY_INITIAL_BACKOFF_MS;

    loop {
        attempt += 1;
        let mut txn = store.begin()?;

        let output = match f(&mut txn) {
            Ok(output) => output,
            Err(e) => {
                if let Err(rollback_err) = txn.rollback() {
                    warn!(error = %rollback_err, "rollback after failed transaction body");
                }
                return Err(e);
            }
        };

        match txn.commit() {
            Ok(()) => return Ok(output),
            Err(e) if e.is_retryable() => {
                if attempt >= max_attempts {
                    return Err(KvError::MaxRetriesExceeded { attempts: attempt }.into());
                }
                debug!(attempt, backoff_ms, error = %e, "transaction conflict, retrying");
                thread::sleep(Duration::from_millis(backoff_ms));
                backoff_ms = (backoff_ms * 2).min(TXN_RETRY_MAX_BACKOFF_MS);
            }
            Err(e) => return Err(e.into()),
        }
    }
}
