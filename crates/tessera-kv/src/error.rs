//! Error types for key-value transactions.

use snafu::Snafu;

/// Errors surfaced by a [`Transaction`](crate::Transaction) or a store.
///
/// `NotFound` is an expected outcome for point reads; callers that treat
/// absence as valid match on it and recover locally.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum KvError {
    /// Requested key was not found.
    #[snafu(display("key {} not found", display_key(key)))]
    NotFound {
        /// Key the caller attempted to read.
        key: Vec<u8>,
    },

    /// Keys must be non-empty.
    #[snafu(display("key must not be empty"))]
    EmptyKey,

    /// Values must be non-empty; the store cannot represent an empty value.
    #[snafu(display("value for key {} must not be empty", display_key(key)))]
    EmptyValue {
        /// Key the caller attempted to write.
        key: Vec<u8>,
    },

    /// Key exceeds [`MAX_KEY_SIZE`](crate::MAX_KEY_SIZE).
    #[snafu(display("key size {size} exceeds maximum of {max} bytes"))]
    KeyTooLarge {
        /// Actual key size.
        size: usize,
        /// Configured limit.
        max: u32,
    },

    /// Value exceeds [`MAX_VALUE_SIZE`](crate::MAX_VALUE_SIZE).
    #[snafu(display("value size {size} exceeds maximum of {max} bytes"))]
    ValueTooLarge {
        /// Actual value size.
        size: usize,
        /// Configured limit.
        max: u32,
    },

    /// Batch read exceeds [`MAX_BATCH_KEYS`](crate::MAX_BATCH_KEYS).
    #[snafu(display("batch size {size} exceeds maximum of {max} keys"))]
    BatchTooLarge {
        /// Number of keys requested.
        size: usize,
        /// Configured limit.
        max: u32,
    },

    /// Optimistic commit failed: a key read by this transaction changed.
    #[snafu(display("transaction conflict on key {}", display_key(key)))]
    Conflict {
        /// First key whose version no longer matches the read set.
        key: Vec<u8>,
    },

    /// Retry budget exhausted while resolving conflicts.
    #[snafu(display("transaction failed after {attempts} attempts"))]
    MaxRetriesExceeded {
        /// Number of attempts made.
        attempts: u32,
    },

    /// Failed to open the redb database file.
    #[snafu(display("failed to open redb database at {}: {source}", path.display()))]
    OpenDatabase {
        /// Path to the database file.
        path: std::path::PathBuf,
        /// The underlying database error.
        #[snafu(source(from(redb::DatabaseError, Box::new)))]
        source: Box<redb::DatabaseError>,
    },

    /// Failed to begin a write transaction.
    #[snafu(display("failed to begin write transaction: {source}"))]
    BeginWrite {
        /// The underlying transaction error.
        #[snafu(source(from(redb::TransactionError, Box::new)))]
        source: Box<redb::TransactionError>,
    },

    /// Failed to open the data table.
    #[snafu(display("failed to open table: {source}"))]
    OpenTable {
        /// The underlying table error.
        #[snafu(source(from(redb::TableError, Box::new)))]
        source: Box<redb::TableError>,
    },

    /// Failed to read a value.
    #[snafu(display("failed to get from table: {source}"))]
    Get {
        /// The underlying storage error.
        #[snafu(source(from(redb::StorageError, Box::new)))]
        source: Box<redb::StorageError>,
    },

    /// Failed to insert a value.
    #[snafu(display("failed to insert into table: {source}"))]
    Insert {
        /// The underlying storage error.
        #[snafu(source(from(redb::StorageError, Box::new)))]
        source: Box<redb::StorageError>,
    },

    /// Failed to remove a value.
    #[snafu(display("failed to remove from table: {source}"))]
    Remove {
        /// The underlying storage error.
        #[snafu(source(from(redb::StorageError, Box::new)))]
        source: Box<redb::StorageError>,
    },

    /// Failed to iterate a table range.
    #[snafu(display("failed to iterate table range: {source}"))]
    Range {
        /// The underlying storage error.
        #[snafu(source(from(redb::StorageError, Box::new)))]
        source: Box<redb::StorageError>,
    },

    /// Failed to commit a transaction.
    #[snafu(display("failed to commit transaction: {source}"))]
    Commit {
        /// The underlying commit error.
        #[snafu(source(from(redb::CommitError, Box::new)))]
        source: Box<redb::CommitError>,
    },

    /// Failed to abort a transaction.
    #[snafu(display("failed to abort transaction: {source}"))]
    Abort {
        /// The underlying storage error.
        #[snafu(source(from(redb::StorageError, Box::new)))]
        source: Box<redb::StorageError>,
    },
}

impl KvError {
    /// Whether this error only reports an absent key.
    pub fn is_not_found(&self) -> bool {
        matches!(self, KvError::NotFound { .. })
    }

    /// Whether retrying the whole transaction may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, KvError::Conflict { .. })
    }
}

/// Render a binary key for error messages without losing non-UTF-8 bytes.
pub(crate) fn display_key(key: &[u8]) -> String {
    key.escape_ascii().to_string()
}
