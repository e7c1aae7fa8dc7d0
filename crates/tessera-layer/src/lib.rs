//! Data-structure layers over an ordered transactional key-value store.
//!
//! This crate encodes higher-level collections into the flat key space of a
//! [`tessera_kv::Transaction`]. Every object is one metadata record (a fixed
//! [`ObjectHeader`] plus type-specific fields) and a family of data keys
//! addressed by the object's identifier.
//!
//! - **Object header**: [`ObjectHeader`], type and encoding tags, expiration
//! - **Key space**: [`KeySpace`] places metadata and data keys under a namespace
//! - **Clock**: [`TimeProvider`] and [`IdGenerator`] with production and manual sources
//! - **Sets**: [`SetHandle`] implements add, remove, membership, cardinality,
//!   enumeration, pop and move
//! - **Config**: [`LayerConfig`] layered from environment and TOML
//!
//! # Architecture
//!
//! ```text
//! Command dispatch (caller)
//!          ↓  opens / commits transactions
//! ┌─────────────────────────────────────┐
//! │        SetHandle                    │  member keys + metadata
//! │  ┌─────────────────────────────┐   │
//! │  │  KeySpace / ObjectHeader    │   │  key layout + header codec
//! │  └─────────────────────────────┘   │
//! └─────────────────────────────────────┘
//!          ↓
//!    tessera_kv::Transaction (raw ordered KV)
//! ```

pub mod clock;
pub mod config;
mod error;
pub mod keys;
pub mod object;
pub mod set;

pub use clock::IdGenerator;
pub use clock::ManualClock;
pub use clock::SystemClock;
pub use clock::TimeProvider;
pub use config::ConfigError;
pub use config::LayerConfig;
pub use error::LayerError;
pub use error::Result;
pub use keys::KeySpace;
pub use object::OBJECT_HEADER_LEN;
pub use object::ObjectEncoding;
pub use object::ObjectHeader;
pub use object::ObjectId;
pub use object::ObjectType;
pub use set::MemberIter;
pub use set::SetHandle;
pub use set::SetMeta;
