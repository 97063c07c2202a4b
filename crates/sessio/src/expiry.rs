//! Typed extraction of the cookie expiration embedded in a session document.
//!
//! The session document is the sole source of truth for expiration: an
//! optional `cookie` object may carry an `expires` field holding an RFC 3339
//! timestamp. Nothing is tracked outside the document; `SessionStore::touch`
//! pushes the extracted deadline into the backend's native TTL.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::store::SessionDocument;

/// A session's expiration deadline, as declared by its document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// The document declares no expiration. Such sessions never receive a
    /// backend TTL.
    None,

    /// The document expires at the given instant (possibly in the past).
    At(DateTime<Utc>),
}

impl Expiry {
    /// Seconds until the deadline, floored to whole seconds.
    ///
    /// Negative for already-passed deadlines; `0` for [`Expiry::None`].
    pub fn remaining_secs(&self) -> i64 {
        match self {
            Expiry::None => 0,
            Expiry::At(deadline) => deadline.timestamp() - Utc::now().timestamp(),
        }
    }
}

/// Extract the expiration deadline from a session document.
///
/// A missing or `null` `cookie`, and a missing or `null` `cookie.expires`,
/// are the normal no-expiry case. A `cookie` that is not an object, an
/// `expires` that is not a string, or a string that is not RFC 3339 are
/// faults ([`Error::MalformedExpiration`]).
pub fn document_expiry(doc: &SessionDocument) -> Result<Expiry> {
    let cookie = match doc.get("cookie") {
        None | Some(Value::Null) => return Ok(Expiry::None),
        Some(value) => value.as_object().ok_or_else(|| {
            Error::MalformedExpiration("cookie field is not an object".into())
        })?,
    };

    let expires = match cookie.get("expires") {
        None | Some(Value::Null) => return Ok(Expiry::None),
        Some(Value::String(s)) => s,
        Some(other) => {
            return Err(Error::MalformedExpiration(format!(
                "expires field is not a string: {other}"
            )));
        }
    };

    let deadline = DateTime::parse_from_rfc3339(expires)
        .map_err(|e| Error::MalformedExpiration(format!("{expires}: {e}")))?;

    Ok(Expiry::At(deadline.with_timezone(&Utc)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    fn doc(value: Value) -> SessionDocument {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_missing_cookie() {
        let doc = doc(json!({"user": "amy"}));
        assert_eq!(document_expiry(&doc).unwrap(), Expiry::None);
    }

    #[test]
    fn test_null_cookie() {
        let doc = doc(json!({"cookie": null}));
        assert_eq!(document_expiry(&doc).unwrap(), Expiry::None);
    }

    #[test]
    fn test_cookie_without_expires() {
        let doc = doc(json!({"cookie": {"path": "/"}}));
        assert_eq!(document_expiry(&doc).unwrap(), Expiry::None);
    }

    #[test]
    fn test_null_expires() {
        let doc = doc(json!({"cookie": {"expires": null}}));
        assert_eq!(document_expiry(&doc).unwrap(), Expiry::None);
    }

    #[test]
    fn test_cookie_not_an_object() {
        let doc = doc(json!({"cookie": "tuesday"}));
        let err = document_expiry(&doc).unwrap_err();
        assert!(matches!(err, Error::MalformedExpiration(_)));
    }

    #[test]
    fn test_expires_not_a_string() {
        let doc = doc(json!({"cookie": {"expires": 1700000000}}));
        let err = document_expiry(&doc).unwrap_err();
        assert!(matches!(err, Error::MalformedExpiration(_)));
    }

    #[test]
    fn test_expires_not_rfc3339() {
        let doc = doc(json!({"cookie": {"expires": "next thursday"}}));
        let err = document_expiry(&doc).unwrap_err();
        assert!(matches!(err, Error::MalformedExpiration(_)));
    }

    #[test]
    fn test_future_expiry() {
        let deadline = Utc::now() + Duration::minutes(10);
        let doc = doc(json!({"cookie": {"expires": deadline.to_rfc3339()}}));

        let expiry = document_expiry(&doc).unwrap();
        let remaining = expiry.remaining_secs();
        assert!((599..=600).contains(&remaining), "remaining = {remaining}");
    }

    #[test]
    fn test_past_expiry_is_negative() {
        let deadline = Utc::now() - Duration::minutes(5);
        let doc = doc(json!({"cookie": {"expires": deadline.to_rfc3339()}}));

        let expiry = document_expiry(&doc).unwrap();
        assert!(expiry.remaining_secs() <= -299);
    }

    #[test]
    fn test_fractional_seconds_accepted() {
        let doc = doc(json!({"cookie": {"expires": "2030-01-02T03:04:05.123456789Z"}}));
        assert!(matches!(document_expiry(&doc).unwrap(), Expiry::At(_)));
    }
}
