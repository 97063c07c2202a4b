//! Key-value backend trait for pluggable storage.
//!
//! This module defines the `KvBackend` trait that the session store drives.
//! Implementations exist for Redis ([`RedisBackend`]) and for an in-process
//! map ([`MemoryBackend`]) used in tests and development.
//!
//! [`RedisBackend`]: crate::RedisBackend
//! [`MemoryBackend`]: crate::MemoryBackend

use crate::error::Result;

/// One page of a cursor-based key scan.
#[derive(Debug, Clone, Default)]
pub struct ScanPage {
    /// Keys returned by this page. May overlap with other pages if keys are
    /// concurrently modified.
    pub keys: Vec<String>,

    /// Cursor to resume from; `0` means the scan is complete.
    pub cursor: u64,
}

/// Trait for key-value storage backends.
///
/// All operations are synchronous round trips. Key absence is reported in
/// the return value (`None`, a zero count), never as an error.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; concurrent command issuance is a
/// backend concern (e.g. a mutexed connection).
pub trait KvBackend: Send + Sync {
    /// Fetch the value stored under `key`, or `None` if absent.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `value` under `key` with no TTL.
    ///
    /// Overwriting an existing key clears any TTL previously applied to it.
    fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Delete `key`, returning the number of keys removed (0 or 1).
    fn delete(&self, key: &str) -> Result<u64>;

    /// Apply a TTL of `seconds` to `key`.
    ///
    /// Zero or negative seconds evict the key immediately. Returns whether
    /// the key existed.
    fn expire(&self, key: &str, seconds: i64) -> Result<bool>;

    /// Fetch one page of keys matching `pattern`, resuming from `cursor`
    /// (`0` starts a scan). `page_size` is a hint, not a guarantee.
    fn scan_page(&self, cursor: u64, pattern: &str, page_size: usize) -> Result<ScanPage>;
}
