//! Outbound commands and the factory functions that build them.
//!
//! A [`Command`] is what handlers hand to the outgoing queue. The payload
//! is serialized when the command is built, so a bad payload fails at the
//! call site instead of inside the send loop.

use serde::Serialize;

use crate::payloads::{
    ChannelMessagePayload, IdentityPayload, JoinChannelPayload,
    PrivateMessagePayload,
};
use crate::{MessageType, ProtocolError, encode_payload, truncate_utf8_safe};

/// A message type plus an optional, already-encoded JSON payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    message_type: MessageType,
    payload: Option<String>,
}

impl Command {
    /// A command with no payload, such as `PIN`.
    pub fn new(message_type: MessageType) -> Self {
        Self {
            message_type,
            payload: None,
        }
    }

    /// A command carrying `payload` encoded as JSON.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Encode`] if the payload can't be serialized.
    pub fn with_payload<T: Serialize>(
        message_type: MessageType,
        payload: &T,
    ) -> Result<Self, ProtocolError> {
        Ok(Self {
            message_type,
            payload: Some(encode_payload(payload)?),
        })
    }

    pub fn message_type(&self) -> MessageType {
        self.message_type
    }

    /// The encoded JSON payload, if any.
    pub fn payload(&self) -> Option<&str> {
        self.payload.as_deref()
    }

    /// Formats the command for the wire: `CODE` or `CODE {json}`.
    pub fn to_wire(&self) -> String {
        match &self.payload {
            Some(payload) => format!("{} {payload}", self.message_type.code()),
            None => self.message_type.code().to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

/// `PIN`: answer to the server's keep-alive ping.
pub fn ping() -> Command {
    Command::new(MessageType::Ping)
}

/// `IDN`: identify with a ticket using the `ticket` method.
pub fn identify(
    account: &str,
    ticket: &str,
    character: &str,
    client_name: &str,
    client_version: &str,
) -> Result<Command, ProtocolError> {
    Command::with_payload(
        MessageType::Identify,
        &IdentityPayload {
            method: "ticket".to_string(),
            account: account.to_string(),
            ticket: ticket.to_string(),
            character: character.to_string(),
            cname: client_name.to_string(),
            cversion: client_version.to_string(),
        },
    )
}

/// `JCH`: join `channel`.
pub fn join_channel(channel: &str) -> Result<Command, ProtocolError> {
    Command::with_payload(
        MessageType::JoinChannel,
        &JoinChannelPayload {
            channel: channel.to_string(),
        },
    )
}

/// `MSG`: say `text` in `channel`, cut to at most `max_bytes` of UTF-8.
pub fn channel_message(
    channel: &str,
    text: &str,
    max_bytes: usize,
) -> Result<Command, ProtocolError> {
    Command::with_payload(
        MessageType::ChannelMessage,
        &ChannelMessagePayload {
            channel: Some(channel.to_string()),
            character: None,
            message: Some(truncate_utf8_safe(max_bytes, text).to_string()),
        },
    )
}

/// `PRI`: privately message `recipient`, cut to at most `max_bytes`.
pub fn private_message(
    recipient: &str,
    text: &str,
    max_bytes: usize,
) -> Result<Command, ProtocolError> {
    Command::with_payload(
        MessageType::PrivateMessage,
        &PrivateMessagePayload {
            recipient: Some(recipient.to_string()),
            character: None,
            message: Some(truncate_utf8_safe(max_bytes, text).to_string()),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_wire_without_payload_is_bare_code() {
        assert_eq!(ping().to_wire(), "PIN");
    }

    #[test]
    fn test_to_wire_with_payload_joins_with_space() {
        let command = join_channel("room1").unwrap();
        assert_eq!(command.to_wire(), r#"JCH {"channel":"room1"}"#);
    }

    #[test]
    fn test_identify_wire_format() {
        let command =
            identify("acct", "tkt", "Darkest Bot", "DarkestBot", "0.0.1").unwrap();
        assert_eq!(
            command.to_wire(),
            r#"IDN {"method":"ticket","account":"acct","ticket":"tkt","character":"Darkest Bot","cname":"DarkestBot","cversion":"0.0.1"}"#
        );
    }

    #[test]
    fn test_channel_message_wire_format() {
        let command = channel_message("room1", "hello", 4096).unwrap();
        assert_eq!(command.message_type(), MessageType::ChannelMessage);
        assert_eq!(
            command.to_wire(),
            r#"MSG {"channel":"room1","message":"hello"}"#
        );
    }

    #[test]
    fn test_channel_message_truncates_to_max_bytes() {
        let command = channel_message("room1", "éééé", 5).unwrap();
        assert_eq!(command.payload(), Some(r#"{"channel":"room1","message":"éé"}"#));
    }

    #[test]
    fn test_private_message_names_recipient() {
        let command = private_message("Alice", "hi there", 3).unwrap();
        assert_eq!(
            command.to_wire(),
            r#"PRI {"recipient":"Alice","message":"hi "}"#
        );
    }

    #[test]
    fn test_with_payload_escapes_json() {
        let command = channel_message("room1", "say \"hi\"\n", 4096).unwrap();
        assert_eq!(
            command.payload(),
            Some(r#"{"channel":"room1","message":"say \"hi\"\n"}"#)
        );
    }
}
