//! Error types for the data-structure layer.

use snafu::Snafu;
use tessera_kv::KvError;

use crate::object::ObjectType;

/// Result alias used throughout the layer.
pub type Result<T, E = LayerError> = std::result::Result<T, E>;

/// Errors surfaced by layer operations.
///
/// Absence of a key is never an error at this level: a missing set, a missing
/// member and a missing destination are all valid outcomes recovered locally.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum LayerError {
    /// Metadata exists under the logical key but describes another type.
    #[snafu(display("key {} holds a {found} object, not a set", display_bytes(key)))]
    TypeMismatch {
        /// Logical key the caller addressed.
        key: Vec<u8>,
        /// Type tag found in the stored header.
        found: ObjectType,
    },

    /// A metadata record does not have the fixed encoded length.
    #[snafu(display("invalid metadata length: expected {expected} bytes, got {actual}"))]
    InvalidLength {
        /// Required record length.
        expected: usize,
        /// Length actually read.
        actual: usize,
    },

    /// An object header could not be decoded.
    #[snafu(display("invalid object header: {reason}"))]
    InvalidObject {
        /// What was wrong with the header.
        reason: String,
    },

    /// A member key holds something other than the sentinel byte.
    #[snafu(display("member key {} holds a non-sentinel value", display_bytes(key)))]
    CorruptSentinel {
        /// Full store key of the corrupt member.
        key: Vec<u8>,
    },

    /// The underlying transaction failed.
    #[snafu(display("storage error: {source}"))]
    Storage {
        /// The store error, unmodified.
        source: KvError,
    },
}

impl LayerError {
    /// Whether the failure is an optimistic conflict worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LayerError::Storage { source } if source.is_retryable())
    }
}

/// Lets layer closures run under [`tessera_kv::transact`].
impl From<KvError> for LayerError {
    fn from(source: KvError) -> Self {
        LayerError::Storage { source }
    }
}

pub(crate) fn display_bytes(bytes: &[u8]) -> String {
    bytes.escape_ascii().to_string()
}
