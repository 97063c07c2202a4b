//! Session store adapter over a key-value backend.

use std::collections::HashSet;

use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::backend::KvBackend;
use crate::config::ConnectionConfig;
use crate::error::{Error, Result};
use crate::expiry;
use crate::redis::RedisBackend;

/// Namespace prefix for every backend key the store owns.
///
/// The prefix never appears in the public API: operations take and return
/// bare session ids, except [`SessionStore::all`], which deliberately
/// returns raw backend keys.
pub const KEY_PREFIX: &str = "sess:";

/// Page-size hint passed to keyspace scans.
const SCAN_PAGE_SIZE: usize = 100;

/// A session document: caller-defined string keys mapped to JSON values.
pub type SessionDocument = Map<String, Value>;

fn session_key(sid: &str) -> String {
    format!("{KEY_PREFIX}{sid}")
}

/// Document-oriented session store over a key-value backend.
///
/// The store holds no state beyond the backend handle: session lifetime is
/// owned by the backend and by the expiration embedded in each document
/// (`cookie.expires`, RFC 3339). [`touch`](Self::touch) is the explicit
/// synchronization point that pushes the document-embedded deadline into the
/// backend's native TTL, which lets upstream logic renegotiate expiration by
/// rewriting the document without the store knowing session semantics.
///
/// All operations are synchronous backend round trips. There is no
/// store-level locking and no retry policy; backend failures propagate
/// unwrapped.
pub struct SessionStore<B: KvBackend = RedisBackend> {
    backend: B,
}

impl SessionStore<RedisBackend> {
    /// Connect to Redis from a connection string
    /// (`redis://[:password@]host[:port][/db]`).
    pub fn connect(conn_str: &str) -> Result<Self> {
        Ok(Self::new(RedisBackend::connect_url(conn_str)?))
    }

    /// Connect to Redis from a configuration.
    pub fn connect_config(config: &ConnectionConfig) -> Result<Self> {
        Ok(Self::new(RedisBackend::connect(config)?))
    }
}

impl<B: KvBackend> SessionStore<B> {
    /// Create a store over an already-constructed backend.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Access the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Store a session document under `sid`.
    ///
    /// No TTL is applied by this call (see [`touch`](Self::touch)).
    /// Overwriting an existing session clears any TTL on its key.
    pub fn set(&self, sid: &str, doc: &SessionDocument) -> Result<()> {
        let bytes = serde_json::to_vec(doc).map_err(Error::Serialization)?;
        self.backend.set(&session_key(sid), &bytes)?;
        debug!(sid = %sid, bytes = bytes.len(), "Stored session");
        Ok(())
    }

    /// Fetch the session document for `sid`, or `None` if there is none.
    pub fn get(&self, sid: &str) -> Result<Option<SessionDocument>> {
        match self.backend.get(&session_key(sid))? {
            Some(bytes) => {
                let doc = serde_json::from_slice(&bytes).map_err(Error::Deserialization)?;
                Ok(Some(doc))
            }
            None => Ok(None),
        }
    }

    /// Delete the session for `sid`. Deleting a session that does not exist
    /// is a no-op success; destroy is idempotent.
    pub fn destroy(&self, sid: &str) -> Result<()> {
        let removed = self.backend.delete(&session_key(sid))?;
        debug!(sid = %sid, removed = removed, "Destroyed session");
        Ok(())
    }

    /// Enumerate every session key in the backend (raw, prefix included).
    ///
    /// Pages through the backend's cursor scan until the zero cursor comes
    /// back. No ordering or snapshot guarantee: keys written or deleted
    /// concurrently may or may not appear. Keys the backend reports on more
    /// than one page are de-duplicated here (first occurrence wins), so
    /// callers never see duplicates.
    pub fn all(&self) -> Result<Vec<String>> {
        let pattern = format!("{KEY_PREFIX}*");
        let mut keys = Vec::new();
        let mut seen = HashSet::new();
        let mut cursor = 0;

        loop {
            let page = self.backend.scan_page(cursor, &pattern, SCAN_PAGE_SIZE)?;
            trace!(cursor = cursor, page_len = page.keys.len(), "Scanned session keys");

            for key in page.keys {
                if seen.insert(key.clone()) {
                    keys.push(key);
                }
            }

            if page.cursor == 0 {
                break;
            }
            cursor = page.cursor;
        }

        Ok(keys)
    }

    /// Delete every session in the store.
    ///
    /// Not atomic: keys are deleted sequentially and the first failure
    /// aborts, leaving the remaining keys intact. A key re-created between
    /// enumeration and deletion will be deleted as well.
    pub fn clear(&self) -> Result<()> {
        let keys = self.all()?;
        let count = keys.len();

        for key in keys {
            self.backend.delete(&key)?;
        }

        debug!(count = count, "Cleared sessions");
        Ok(())
    }

    /// Number of sessions currently in the store.
    ///
    /// Enumeration failures propagate rather than masking as a zero count.
    pub fn len(&self) -> Result<usize> {
        Ok(self.all()?.len())
    }

    /// Check whether the store holds no sessions.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Remaining lifetime of the session in whole seconds, derived entirely
    /// from the stored document.
    ///
    /// `0` when the session is absent or its document declares no
    /// expiration; negative when the embedded deadline has already passed.
    /// Fails with [`Error::MalformedExpiration`] if `cookie.expires` exists
    /// but is malformed.
    pub fn ttl(&self, sid: &str) -> Result<i64> {
        let Some(doc) = self.get(sid)? else {
            return Ok(0);
        };
        Ok(expiry::document_expiry(&doc)?.remaining_secs())
    }

    /// Push the session's document-embedded expiration into the backend TTL.
    ///
    /// The expire command is issued unconditionally, including for zero or
    /// negative TTLs — the backend's own semantics apply (immediate
    /// eviction). This is intentional propagation, not a guard.
    pub fn touch(&self, sid: &str) -> Result<()> {
        let ttl = self.ttl(sid)?;
        let applied = self.backend.expire(&session_key(sid), ttl)?;
        debug!(sid = %sid, ttl = ttl, applied = applied, "Touched session");
        Ok(())
    }
}
