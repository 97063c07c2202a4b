//! Backend connection configuration.

use std::str::FromStr;

use url::Url;

use crate::error::{Error, Result};

/// Default Redis port.
pub const DEFAULT_PORT: u16 = 6379;

/// Default database index.
pub const DEFAULT_DB: i64 = 0;

/// Connection settings for the key-value backend.
///
/// Built either directly (builder methods) or parsed from a connection
/// string of the form `redis://[:password@]host[:port][/db]`. An absent
/// password defaults to none and an absent database index to `0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Backend host name or address.
    pub host: String,

    /// Backend port.
    pub port: u16,

    /// Optional password (AUTH).
    pub password: Option<String>,

    /// Database index selected after connecting.
    pub db: i64,
}

impl ConnectionConfig {
    /// Create a configuration for the given host with defaults.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            password: None,
            db: DEFAULT_DB,
        }
    }

    /// Set the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the password.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Set the database index.
    pub fn with_db(mut self, db: i64) -> Self {
        self.db = db;
        self
    }

    /// Parse a connection string.
    ///
    /// Accepted form: `redis://[:password@]host[:port][/db]`.
    pub fn parse(conn_str: &str) -> Result<Self> {
        let parsed = Url::parse(conn_str)
            .map_err(|e| Error::Connection(format!("invalid connection string: {e}")))?;

        if parsed.scheme() != "redis" {
            return Err(Error::Connection(format!(
                "unsupported scheme: {}",
                parsed.scheme()
            )));
        }

        let host = parsed
            .host_str()
            .ok_or_else(|| Error::Connection("missing host".into()))?
            .to_string();

        let db = match parsed.path().trim_matches('/') {
            "" => DEFAULT_DB,
            segment => segment.parse::<i64>().map_err(|_| {
                Error::Connection(format!("invalid database index: {segment}"))
            })?,
        };

        let password = parsed
            .password()
            .filter(|p| !p.is_empty())
            .map(str::to_string);

        Ok(Self {
            host,
            port: parsed.port().unwrap_or(DEFAULT_PORT),
            password,
            db,
        })
    }
}

impl FromStr for ConnectionConfig {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
