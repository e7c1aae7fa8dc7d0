//! Fixed-width object header shared by every data type.
//!
//! Each logical key stores one metadata record that begins with this header:
//!
//! ```text
//! id(16) | type(1) | encoding(1) | created_at(8 BE) | updated_at(8 BE) | expire_at(8 BE)
//! ```
//!
//! Type-specific metadata (for example a set's cardinality) is appended after
//! the header by the owning layer.

use std::fmt;

use crate::error::InvalidObjectSnafu;
use crate::error::Result;

// ============================================================================
// Layout
// ============================================================================

/// Size of an object identifier in bytes.
pub const OBJECT_ID_LEN: usize = 16;

/// Encoded size of an [`ObjectHeader`] in bytes.
pub const OBJECT_HEADER_LEN: usize = OBJECT_ID_LEN + 1 + 1 + 8 + 8 + 8;

const TYPE_OFFSET: usize = OBJECT_ID_LEN;
const ENCODING_OFFSET: usize = TYPE_OFFSET + 1;
const CREATED_OFFSET: usize = ENCODING_OFFSET + 1;
const UPDATED_OFFSET: usize = CREATED_OFFSET + 8;
const EXPIRE_OFFSET: usize = UPDATED_OFFSET + 8;

/// Internal identifier of one object instance.
pub type ObjectId = [u8; OBJECT_ID_LEN];

/// Data type tag stored in the header.
///
/// Tags written by types this build does not know decode as
/// [`ObjectType::Unknown`] so callers can still report a type mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    /// Plain string value.
    String,
    /// List.
    List,
    /// Hash map.
    Hash,
    /// Unordered set of members.
    Set,
    /// Sorted set.
    ZSet,
    /// A tag outside the known range, kept verbatim.
    Unknown(u8),
}

impl ObjectType {
    /// Wire tag of this type.
    pub fn tag(self) -> u8 {
        match self {
            ObjectType::String => 0,
            ObjectType::List => 1,
            ObjectType::Hash => 2,
            ObjectType::Set => 3,
            ObjectType::ZSet => 4,
            ObjectType::Unknown(tag) => tag,
        }
    }

    fn from_tag(tag: u8) -> Self {
        match tag {
            0 => ObjectType::String,
            1 => ObjectType::List,
            2 => ObjectType::Hash,
            3 => ObjectType::Set,
            4 => ObjectType::ZSet,
            other => ObjectType::Unknown(other),
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectType::String => f.write_str("string"),
            ObjectType::List => f.write_str("list"),
            ObjectType::Hash => f.write_str("hash"),
            ObjectType::Set => f.write_str("set"),
            ObjectType::ZSet => f.write_str("zset"),
            ObjectType::Unknown(tag) => write!(f, "unknown (tag {tag})"),
        }
    }
}

/// Physical encoding tag stored in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ObjectEncoding {
    /// Raw bytes.
    Raw = 0,
    /// Integer-encoded value.
    Int = 1,
    /// One store key per element.
    HashTable = 2,
    /// Packed list in a single value.
    ZipList = 3,
    /// Linked list of element keys.
    LinkedList = 4,
    /// Skip list of element keys.
    SkipList = 5,
}

impl ObjectEncoding {
    fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(ObjectEncoding::Raw),
            1 => Some(ObjectEncoding::Int),
            2 => Some(ObjectEncoding::HashTable),
            3 => Some(ObjectEncoding::ZipList),
            4 => Some(ObjectEncoding::LinkedList),
            5 => Some(ObjectEncoding::SkipList),
            _ => None,
        }
    }
}

/// Common header of every stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectHeader {
    /// Identifier namespacing the object's data keys.
    pub id: ObjectId,
    /// Data type tag.
    pub object_type: ObjectType,
    /// Physical encoding tag.
    pub encoding: ObjectEncoding,
    /// Creation time, Unix milliseconds.
    pub created_at_ms: u64,
    /// Last metadata write, Unix milliseconds.
    pub updated_at_ms: u64,
    /// Expiration time, Unix milliseconds. `0` means no expiration.
    pub expire_at_ms: u64,
}

/// Encode a header into exactly [`OBJECT_HEADER_LEN`] bytes.
pub fn encode_header(header: &ObjectHeader) -> Vec<u8> {
    let mut buf = Vec::with_capacity(OBJECT_HEADER_LEN);
    buf.extend_from_slice(&header.id);
    buf.push(header.object_type.tag());
    buf.push(header.encoding as u8);
    buf.extend_from_slice(&header.created_at_ms.to_be_bytes());
    buf.extend_from_slice(&header.updated_at_ms.to_be_bytes());
    buf.extend_from_slice(&header.expire_at_ms.to_be_bytes());
    debug_assert_eq!(buf.len(), OBJECT_HEADER_LEN);
    buf
}

/// Decode a header from exactly [`OBJECT_HEADER_LEN`] bytes.
pub fn decode_header(bytes: &[u8]) -> Result<ObjectHeader> {
    if bytes.len() != OBJECT_HEADER_LEN {
        return InvalidObjectSnafu {
            reason: format!("header is {} bytes, expected {OBJECT_HEADER_LEN}", bytes.len()),
        }
        .fail();
    }

    let mut id = [0u8; OBJECT_ID_LEN];
    id.copy_from_slice(&bytes[..OBJECT_ID_LEN]);

    let object_type = ObjectType::from_tag(bytes[TYPE_OFFSET]);

    let encoding_tag = bytes[ENCODING_OFFSET];
    let Some(encoding) = ObjectEncoding::from_tag(encoding_tag) else {
        return InvalidObjectSnafu {
            reason: format!("unknown object encoding tag {encoding_tag}"),
        }
        .fail();
    };

    Ok(ObjectHeader {
        id,
        object_type,
        encoding,
        created_at_ms: read_u64(bytes, CREATED_OFFSET),
        updated_at_ms: read_u64(bytes, UPDATED_OFFSET),
        expire_at_ms: read_u64(bytes, EXPIRE_OFFSET),
    })
}

/// Whether the header's expiration time is set and not after `now_ms`.
#[inline]
pub fn is_expired(header: &ObjectHeader, now_ms: u64) -> bool {
    header.expire_at_ms != 0 && header.expire_at_ms <= now_ms
}

fn read_u64(bytes: &[u8], offset: usize) -> u64 {
    let mut word = [0u8; 8];
    word.copy_from_slice(&bytes[offset..offset + 8]);
    u64::from_be_bytes(word)
}
