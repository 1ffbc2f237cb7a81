//! Payload shapes for the message types the client reads or writes.
//!
//! Inbound payloads come from the server and can't be trusted to carry
//! every field, so their fields are `Option`s with `#[serde(default)]`.
//! Handlers check the fields they need after decoding. Outbound fields
//! that are `None` are left out of the JSON entirely.

use serde::{Deserialize, Serialize};

/// `IDN`: identify with a ticket right after connecting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityPayload {
    pub method: String,
    pub account: String,
    pub ticket: String,
    pub character: String,
    /// Client name.
    pub cname: String,
    /// Client version.
    pub cversion: String,
}

/// `JCH`: join a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinChannelPayload {
    pub channel: String,
}

/// `MSG`: a chat message in a channel.
///
/// Outbound messages carry `channel` and `message`; the server adds
/// `character` (the sender) on inbound ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelMessagePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// `PRI`: a private message.
///
/// Outbound messages name the `recipient`; inbound ones name the sender
/// in `character`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateMessagePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// `CIU`: someone invited us to a channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelInvitePayload {
    /// Character who sent the invite.
    #[serde(default)]
    pub sender: Option<String>,
    /// Human-readable channel title.
    #[serde(default)]
    pub title: Option<String>,
    /// Channel id to join.
    #[serde(default)]
    pub name: Option<String>,
}

/// `VAR`: the server announcing one of its variables.
///
/// The value's type depends on the variable: `chat_max` is an integer,
/// `msg_flood` a number of seconds, others are strings or lists. It stays
/// raw JSON until the handler knows which variable it's looking at.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VarPayload {
    #[serde(default)]
    pub variable: Option<String>,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{decode_payload, encode_payload};

    #[test]
    fn test_channel_message_outbound_skips_missing_sender() {
        let payload = ChannelMessagePayload {
            channel: Some("room1".into()),
            character: None,
            message: Some("hi".into()),
        };
        assert_eq!(
            encode_payload(&payload).unwrap(),
            r#"{"channel":"room1","message":"hi"}"#
        );
    }

    #[test]
    fn test_channel_message_inbound_missing_fields_are_none() {
        let payload: ChannelMessagePayload =
            decode_payload(r#"{"channel":"room1"}"#).unwrap();
        assert_eq!(payload.channel.as_deref(), Some("room1"));
        assert!(payload.character.is_none());
        assert!(payload.message.is_none());
    }

    #[test]
    fn test_var_payload_keeps_raw_value() {
        let payload: VarPayload =
            decode_payload(r#"{"variable":"msg_flood","value":0.5}"#).unwrap();
        assert_eq!(payload.variable.as_deref(), Some("msg_flood"));
        assert_eq!(payload.value.and_then(|v| v.as_f64()), Some(0.5));
    }

    #[test]
    fn test_identity_payload_field_names_match_wire() {
        let payload = IdentityPayload {
            method: "ticket".into(),
            account: "acct".into(),
            ticket: "tkt".into(),
            character: "Darkest Bot".into(),
            cname: "DarkestBot".into(),
            cversion: "0.0.1".into(),
        };
        assert_eq!(
            encode_payload(&payload).unwrap(),
            r#"{"method":"ticket","account":"acct","ticket":"tkt","character":"Darkest Bot","cname":"DarkestBot","cversion":"0.0.1"}"#
        );
    }
}
