//! In-process key-value backend for tests and development.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::backend::{KvBackend, ScanPage};
use crate::error::Result;

struct Entry {
    value: Vec<u8>,
    expires_at: Option<Instant>,
}

impl Entry {
    fn expired(&self) -> bool {
        self.expires_at.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

/// Key-value backend backed by an in-process map.
///
/// Mirrors the backend contract the store relies on: `set` clears any TTL on
/// the key, `expire` with zero or negative seconds evicts immediately, and
/// expired entries are invisible to reads and scans. Scan cursors are resume
/// offsets into a sorted snapshot of the live keys, so multi-page scans
/// behave like the real thing.
#[derive(Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remaining TTL for `key`, or `None` if the key is absent or has no
    /// deadline. Not part of [`KvBackend`]; exists so tests can observe the
    /// deadline a `touch` applied.
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        let entries = self.entries.lock();
        let entry = entries.get(key)?;
        if entry.expired() {
            return None;
        }
        entry
            .expires_at
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }
}

impl KvBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut entries = self.entries.lock();
        let expired = match entries.get(key) {
            Some(entry) if entry.expired() => true,
            Some(entry) => return Ok(Some(entry.value.clone())),
            None => return Ok(None),
        };
        if expired {
            entries.remove(key);
        }
        Ok(None)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.entries.lock().insert(
            key.to_string(),
            Entry {
                value: value.to_vec(),
                expires_at: None,
            },
        );
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<u64> {
        let mut entries = self.entries.lock();
        match entries.remove(key) {
            Some(entry) if !entry.expired() => Ok(1),
            _ => Ok(0),
        }
    }

    fn expire(&self, key: &str, seconds: i64) -> Result<bool> {
        let mut entries = self.entries.lock();

        let expired = match entries.get(key) {
            Some(entry) => entry.expired(),
            None => return Ok(false),
        };
        if expired {
            entries.remove(key);
            return Ok(false);
        }

        if seconds <= 0 {
            entries.remove(key);
        } else if let Some(entry) = entries.get_mut(key) {
            entry.expires_at = Some(Instant::now() + Duration::from_secs(seconds as u64));
        }

        Ok(true)
    }

    fn scan_page(&self, cursor: u64, pattern: &str, page_size: usize) -> Result<ScanPage> {
        let entries = self.entries.lock();

        let mut live: Vec<&String> = entries
            .iter()
            .filter(|(key, entry)| !entry.expired() && matches_pattern(pattern, key.as_str()))
            .map(|(key, _)| key)
            .collect();
        live.sort();

        let start = (cursor as usize).min(live.len());
        let end = (start + page_size).min(live.len());
        let keys = live[start..end].iter().map(|k| k.to_string()).collect();
        let next = if end == live.len() { 0 } else { end as u64 };

        Ok(ScanPage { keys, cursor: next })
    }
}

/// Match a key against a scan pattern. Only the forms the store issues are
/// supported: a literal key, or a literal prefix followed by `*`.
fn matches_pattern(pattern: &str, key: &str) -> bool {
    match pattern.strip_suffix('*') {
        Some(prefix) => key.starts_with(prefix),
        None => key == pattern,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_roundtrip() {
        let backend = MemoryBackend::new();
        backend.set("k", b"v").unwrap();
        assert_eq!(backend.get("k").unwrap(), Some(b"v".to_vec()));
        assert_eq!(backend.get("missing").unwrap(), None);
    }

    #[test]
    fn test_delete_counts() {
        let backend = MemoryBackend::new();
        backend.set("k", b"v").unwrap();
        assert_eq!(backend.delete("k").unwrap(), 1);
        assert_eq!(backend.delete("k").unwrap(), 0);
    }

    #[test]
    fn test_expire_nonpositive_evicts() {
        let backend = MemoryBackend::new();
        backend.set("k", b"v").unwrap();
        assert!(backend.expire("k", 0).unwrap());
        assert_eq!(backend.get("k").unwrap(), None);

        backend.set("k", b"v").unwrap();
        assert!(backend.expire("k", -5).unwrap());
        assert_eq!(backend.get("k").unwrap(), None);
    }

    #[test]
    fn test_expire_missing_key() {
        let backend = MemoryBackend::new();
        assert!(!backend.expire("missing", 60).unwrap());
    }

    #[test]
    fn test_set_clears_ttl() {
        let backend = MemoryBackend::new();
        backend.set("k", b"v").unwrap();
        backend.expire("k", 60).unwrap();
        assert!(backend.ttl("k").is_some());

        backend.set("k", b"v2").unwrap();
        assert_eq!(backend.ttl("k"), None);
    }

    #[test]
    fn test_scan_pages_cover_all_keys() {
        let backend = MemoryBackend::new();
        for i in 0..7 {
            backend.set(&format!("sess:{i}"), b"v").unwrap();
        }
        backend.set("other:1", b"v").unwrap();

        let mut keys = Vec::new();
        let mut cursor = 0;
        let mut pages = 0;
        loop {
            let page = backend.scan_page(cursor, "sess:*", 3).unwrap();
            keys.extend(page.keys);
            pages += 1;
            if page.cursor == 0 {
                break;
            }
            cursor = page.cursor;
        }

        assert_eq!(pages, 3);
        assert_eq!(keys.len(), 7);
        assert!(keys.iter().all(|k| k.starts_with("sess:")));
    }

    #[test]
    fn test_scan_empty() {
        let backend = MemoryBackend::new();
        let page = backend.scan_page(0, "sess:*", 100).unwrap();
        assert!(page.keys.is_empty());
        assert_eq!(page.cursor, 0);
    }

    #[test]
    fn test_pattern_matching() {
        assert!(matches_pattern("sess:*", "sess:abc"));
        assert!(matches_pattern("sess:*", "sess:"));
        assert!(!matches_pattern("sess:*", "other:abc"));
        assert!(matches_pattern("exact", "exact"));
        assert!(!matches_pattern("exact", "exact2"));
    }
}
