//! Error types for session store operations.

use thiserror::Error;

/// Errors that can occur in the session store.
///
/// Absence of a session is never an error: `get` on an unknown id returns
/// `Ok(None)` and `destroy` on an unknown id succeeds.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed connection string, or the backend was unreachable at setup.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Command-level backend failure.
    #[error("Backend error: {0}")]
    Backend(#[from] redis::RedisError),

    /// Session document could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Stored bytes are not a valid session document.
    #[error("Deserialization error: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// The `cookie.expires` field exists but is malformed.
    #[error("Malformed cookie expiration: {0}")]
    MalformedExpiration(String),
}

/// Result type alias for session store operations.
pub type Result<T> = std::result::Result<T, Error>;
