//! Set metadata record.
//!
//! ```text
//! object header (OBJECT_HEADER_LEN) | len (8 BE)
//! ```

use crate::error::InvalidLengthSnafu;
use crate::error::Result;
use crate::object::OBJECT_HEADER_LEN;
use crate::object::ObjectHeader;
use crate::object::decode_header;
use crate::object::encode_header;

/// Encoded size of a [`SetMeta`] record.
pub const SET_META_LEN: usize = OBJECT_HEADER_LEN + 8;

/// Persisted description of one set instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetMeta {
    /// Common object header.
    pub header: ObjectHeader,
    /// Number of member keys under the set's data prefix.
    pub len: u64,
}

impl SetMeta {
    /// Encode into exactly [`SET_META_LEN`] bytes.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = encode_header(&self.header);
        buf.extend_from_slice(&self.len.to_be_bytes());
        buf
    }

    /// Decode a record, which must be exactly [`SET_META_LEN`] bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        snafu::ensure!(
            bytes.len() == SET_META_LEN,
            InvalidLengthSnafu {
                expected: SET_META_LEN,
                actual: bytes.len(),
            }
        );

        let (header, len) = bytes.split_at(OBJECT_HEADER_LEN);
        let mut word = [0u8; 8];
        word.copy_from_slice(len);

        Ok(Self {
            header: decode_header(header)?,
            len: u64::from_be_bytes(word),
        })
    }
}
