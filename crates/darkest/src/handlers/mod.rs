//! Handlers for the inbound message types the bot acts on.
//!
//! Each handler decodes its payload with [`parse_payload`], checks the
//! fields it needs, and then either touches state, queues a reply, or
//! hands chat text to the user commands. A payload that can't be used is
//! logged and dropped; it never ends the session.

mod channel_invite;
mod channel_message;
mod ping;
mod private_message;
mod variable;

use serde::de::DeserializeOwned;

use darkest_protocol::decode_payload;

pub use channel_invite::ChannelInviteHandler;
pub use channel_message::ChannelMessageHandler;
pub use ping::PingHandler;
pub use private_message::PrivateMessageHandler;
pub use variable::VariableHandler;

/// Decodes a payload, logging at `error` and returning `None` when it's
/// malformed or `null`.
pub(crate) fn parse_payload<T: DeserializeOwned>(payload: &str) -> Option<T> {
    match decode_payload(payload) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            tracing::error!(error = %e, %payload, "unable to parse payload");
            None
        }
    }
}

/// `Some(value)` if `value` is present and non-empty.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use darkest_protocol::payloads::JoinChannelPayload;

    #[test]
    fn test_parse_payload_valid_returns_some() {
        let parsed: Option<JoinChannelPayload> = parse_payload(r#"{"channel":"room1"}"#);
        assert_eq!(parsed.unwrap().channel, "room1");
    }

    #[test]
    fn test_parse_payload_null_or_malformed_returns_none() {
        for payload in ["null", "", "{oops"] {
            assert!(parse_payload::<JoinChannelPayload>(payload).is_none(), "{payload:?}");
        }
    }

    #[test]
    fn test_non_empty_filters_blank() {
        assert_eq!(non_empty(Some("a".into())), Some("a".into()));
        assert_eq!(non_empty(Some(String::new())), None);
        assert_eq!(non_empty(None), None);
    }
}
