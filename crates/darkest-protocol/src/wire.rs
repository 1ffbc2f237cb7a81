//! Splitting raw wire text into a code and a payload.
//!
//! A wire message looks like `MSG {"channel":"room1",...}`: three
//! characters of code, one space, then JSON. Messages with no payload
//! (`PIN`) are just the code.

use crate::ProtocolError;
use crate::message_type::CODE_LEN;

/// Character offset where the payload starts: the code plus one separator.
pub const PAYLOAD_OFFSET: usize = CODE_LEN + 1;

/// A raw message split into its parts, borrowing from the original text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawMessage<'a> {
    /// The leading code, exactly [`CODE_LEN`] characters. It may not be a
    /// code we know about.
    pub code: &'a str,
    /// Everything after [`PAYLOAD_OFFSET`]; empty when the message is only
    /// 3 or 4 characters long.
    pub payload: &'a str,
}

/// Splits a raw message into its code and payload.
///
/// Offsets count characters, not bytes, so a stray multi-byte character
/// near the front can't cause a slice inside a code point.
///
/// # Errors
/// Returns [`ProtocolError::TooShort`] if the message has fewer than
/// [`CODE_LEN`] characters.
pub fn split_message(raw: &str) -> Result<RawMessage<'_>, ProtocolError> {
    let mut boundaries = raw.char_indices().map(|(i, _)| i).chain([raw.len()]);

    let code_end = boundaries
        .nth(CODE_LEN)
        .ok_or_else(|| ProtocolError::TooShort(raw.to_string()))?;
    // One more step skips the separator, whatever character it is.
    let payload_start = boundaries.next().unwrap_or(raw.len());

    Ok(RawMessage {
        code: &raw[..code_end],
        payload: &raw[payload_start..],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_message_with_payload() {
        let msg = split_message(r#"JCH {"channel":"room1"}"#).unwrap();
        assert_eq!(msg.code, "JCH");
        assert_eq!(msg.payload, r#"{"channel":"room1"}"#);
    }

    #[test]
    fn test_split_message_bare_code_has_empty_payload() {
        let msg = split_message("PIN").unwrap();
        assert_eq!(msg.code, "PIN");
        assert_eq!(msg.payload, "");
    }

    #[test]
    fn test_split_message_four_chars_has_empty_payload() {
        let msg = split_message("PIN ").unwrap();
        assert_eq!(msg.code, "PIN");
        assert_eq!(msg.payload, "");
    }

    #[test]
    fn test_split_message_too_short_returns_error() {
        for raw in ["", "P", "PI"] {
            assert!(
                matches!(split_message(raw), Err(ProtocolError::TooShort(_))),
                "{raw:?}"
            );
        }
    }

    #[test]
    fn test_split_message_multibyte_code_does_not_panic() {
        let msg = split_message("éé").map(|m| m.code);
        assert!(msg.is_err());

        let msg = split_message("ééé payload").unwrap();
        assert_eq!(msg.code, "ééé");
        assert_eq!(msg.payload, "payload");
    }
}
