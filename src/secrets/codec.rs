//! Secret envelope codec.
//!
//! Owns the storage representation of a secret (payload + expiration) and
//! the redaction rule applied to any caller payload echoed back inside an
//! error body. Decoding failures mean storage-layer corruption, never
//! caller error: data written through [`encode`] always decodes.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Value};

use crate::errors::{Error, Result};

/// Replacement token for redacted secret material.
pub const REDACTED: &str = "(OMITTED)";

/// Decoded form of a stored secret.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub payload: Value,
    pub expires: DateTime<Utc>,
}

/// Encode a payload and expiration into the on-storage envelope.
///
/// Lossless structural transformation: the payload JSON tree is embedded
/// verbatim, the expiration rendered as RFC 3339.
pub fn encode(payload: &Value, expires: DateTime<Utc>) -> String {
    json!({
        "secret": payload,
        "expires": expires.to_rfc3339_opts(SecondsFormat::Millis, true),
    })
    .to_string()
}

/// Decode a stored envelope back into payload and expiration.
///
/// Fails with [`Error::CorruptEnvelope`] when the structure lacks required
/// fields or the expiration is not a valid timestamp.
pub fn decode(raw: &str) -> Result<Envelope> {
    let mut value: Value = serde_json::from_str(raw)
        .map_err(|e| Error::corrupt_envelope(format!("envelope is not valid JSON: {}", e)))?;

    let payload = value
        .get_mut("secret")
        .map(Value::take)
        .ok_or_else(|| Error::corrupt_envelope("envelope is missing the secret field"))?;

    let expires_raw = value
        .get("expires")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::corrupt_envelope("envelope is missing the expires field"))?;

    let expires = DateTime::parse_from_rfc3339(expires_raw)
        .map_err(|e| Error::corrupt_envelope(format!("invalid expires timestamp: {}", e)))?
        .with_timezone(&Utc);

    Ok(Envelope { payload, expires })
}

/// Redact a request payload for inclusion in an error or audit body.
///
/// Any field literally named `secret` is replaced with [`REDACTED`]. This
/// is a security invariant on every path that echoes caller input, not a
/// formatting nicety.
pub fn redact(request_payload: &Value) -> Value {
    let mut sanitized = request_payload.clone();
    if let Some(object) = sanitized.as_object_mut() {
        if let Some(secret) = object.get_mut("secret") {
            *secret = Value::String(REDACTED.to_string());
        }
    }
    sanitized
}
