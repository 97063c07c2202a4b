//! Redis-backed session store with document-derived TTLs.
//!
//! This crate persists opaque per-session JSON documents in a key-value
//! backend under `sess:`-prefixed keys and derives each session's expiration
//! from the `cookie.expires` RFC 3339 timestamp embedded in the document
//! itself:
//! - CRUD on session documents (`set` / `get` / `destroy`)
//! - full-keyspace enumeration via an iterative cursor scan (`all`, `clear`,
//!   `len`)
//! - TTL derivation from the document and explicit synchronization into the
//!   backend's native expiration (`ttl`, `touch`)
//!
//! The backend is a capability trait, so the Redis implementation can be
//! swapped for the in-process [`MemoryBackend`] in tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use sessio::SessionStore;
//!
//! let store = SessionStore::connect("redis://localhost/0")?;
//! store.set("abc123", &doc)?;
//! store.touch("abc123")?;
//! ```

mod backend;
mod config;
mod error;
mod expiry;
mod memory;
mod redis;
mod store;

pub use backend::{KvBackend, ScanPage};
pub use config::ConnectionConfig;
pub use error::{Error, Result};
pub use expiry::{Expiry, document_expiry};
pub use memory::MemoryBackend;
pub use self::redis::RedisBackend;
pub use store::{KEY_PREFIX, SessionDocument, SessionStore};
