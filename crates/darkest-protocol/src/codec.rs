//! JSON encoding and decoding of message payloads.
//!
//! Payloads are the JSON part of a wire message: everything after the
//! 3-letter code and the separating space. These helpers turn typed
//! payload structs into that JSON text and back, mapping serde's errors
//! into [`ProtocolError`] so callers deal with one error type.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// Serializes a payload into compact JSON text.
///
/// # Errors
/// Returns [`ProtocolError::Encode`] if the value can't be represented
/// as JSON (for example a map with non-string keys).
pub fn encode_payload<T: Serialize>(value: &T) -> Result<String, ProtocolError> {
    serde_json::to_string(value).map_err(ProtocolError::Encode)
}

/// Deserializes a payload string into `T`.
///
/// A payload that is literally `null` is rejected with
/// [`ProtocolError::NullPayload`] rather than producing a default value,
/// so handlers never act on an empty shell.
///
/// # Errors
/// - [`ProtocolError::NullPayload`]: the payload is JSON `null`
/// - [`ProtocolError::Decode`]: malformed JSON or the wrong shape
pub fn decode_payload<T: DeserializeOwned>(
    payload: &str,
) -> Result<T, ProtocolError> {
    // Go through `Option<T>` so `null` is distinguishable from a
    // genuinely malformed payload.
    let parsed: Option<T> =
        serde_json::from_str(payload).map_err(ProtocolError::Decode)?;
    parsed.ok_or(ProtocolError::NullPayload)
}
