//! Redis implementation of the key-value backend.

use parking_lot::Mutex;
use redis::{Commands, ConnectionAddr, ConnectionInfo, RedisConnectionInfo};
use tracing::debug;

use crate::backend::{KvBackend, ScanPage};
use crate::config::ConnectionConfig;
use crate::error::{Error, Result};

/// Key-value backend backed by a blocking Redis connection.
///
/// Holds a single connection behind a mutex; commands issued concurrently
/// are serialized. The connection is opened once and reused for the life of
/// the backend — closing it is left to drop.
pub struct RedisBackend {
    /// The Redis connection (wrapped in Mutex for thread safety).
    conn: Mutex<redis::Connection>,
}

impl RedisBackend {
    /// Connect using the given configuration.
    ///
    /// Fails with [`Error::Connection`] if the backend is unreachable.
    pub fn connect(config: &ConnectionConfig) -> Result<Self> {
        let info = ConnectionInfo {
            addr: ConnectionAddr::Tcp(config.host.clone(), config.port),
            redis: RedisConnectionInfo {
                db: config.db,
                password: config.password.clone(),
                ..Default::default()
            },
        };

        let client =
            redis::Client::open(info).map_err(|e| Error::Connection(e.to_string()))?;
        let conn = client
            .get_connection()
            .map_err(|e| Error::Connection(e.to_string()))?;

        debug!(host = %config.host, port = config.port, db = config.db, "Connected to Redis");

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Parse a connection string and connect.
    pub fn connect_url(conn_str: &str) -> Result<Self> {
        Self::connect(&ConnectionConfig::parse(conn_str)?)
    }

    /// Build a backend from a client the caller already holds.
    ///
    /// Useful when the application shares one client across subsystems, or
    /// for pointing the store at a test server.
    pub fn from_client(client: &redis::Client) -> Result<Self> {
        let conn = client
            .get_connection()
            .map_err(|e| Error::Connection(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl KvBackend for RedisBackend {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let value: Option<Vec<u8>> = self.conn.lock().get(key)?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let _: () = self.conn.lock().set(key, value)?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<u64> {
        let removed: u64 = self.conn.lock().del(key)?;
        Ok(removed)
    }

    fn expire(&self, key: &str, seconds: i64) -> Result<bool> {
        let applied: bool = self.conn.lock().expire(key, seconds)?;
        Ok(applied)
    }

    fn scan_page(&self, cursor: u64, pattern: &str, page_size: usize) -> Result<ScanPage> {
        let mut conn = self.conn.lock();
        let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
            .arg(cursor)
            .arg("MATCH")
            .arg(pattern)
            .arg("COUNT")
            .arg(page_size)
            .query(&mut *conn)?;

        Ok(ScanPage { keys, cursor: next })
    }
}
