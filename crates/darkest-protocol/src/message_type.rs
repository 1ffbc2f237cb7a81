//! The closed set of protocol message types and the code registry.
//!
//! Every message on the wire starts with a 3-letter code such as `PIN` or
//! `MSG`. [`MessageType`] is the Rust-side name for each code, and
//! [`MessageTypeRegistry`] maps the code strings back to the enum.
//!
//! The registry is built once from a table literal. Building it checks
//! that no code appears twice, so a typo that reuses a code fails at
//! startup instead of silently shadowing another type.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use crate::ProtocolError;

/// Length of every message type code, in characters.
pub const CODE_LEN: usize = 3;

// ---------------------------------------------------------------------------
// MessageType
// ---------------------------------------------------------------------------

/// A protocol message type.
///
/// Variants are named for what the message means; [`code()`](Self::code)
/// gives the 3-letter wire code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    /// `ADL`: global operator list.
    GlobalOps,
    /// `CDS`: channel description changed.
    ChannelDescription,
    /// `CIU`: invitation to a channel.
    ChannelInvite,
    /// `COL`: channel operator list.
    ChannelOps,
    /// `CON`: connected user count.
    ConnectionCount,
    /// `FLN`: a character went offline.
    Offline,
    /// `FRL`: friends list.
    FriendsList,
    /// `HLO`: server greeting and version.
    Hello,
    /// `ICH`: initial channel data (users, name, mode).
    InitialChannelData,
    /// `IDN`: identify (outbound) or identify acknowledgement (inbound).
    Identify,
    /// `IGN`: ignore list.
    IgnoreList,
    /// `JCH`: join channel (outbound) or someone joined (inbound).
    JoinChannel,
    /// `LIS`: list of online characters.
    CharacterList,
    /// `MSG`: channel chat message.
    ChannelMessage,
    /// `NLN`: a character came online.
    Online,
    /// `PIN`: keep-alive ping.
    Ping,
    /// `PRI`: private message.
    PrivateMessage,
    /// `STA`: a character changed status.
    Status,
    /// `TPN`: typing notification.
    Typing,
    /// `VAR`: server variable announcement.
    Variable,
}

/// Every built-in message type paired with its wire code.
pub const BUILTIN_TYPES: &[(MessageType, &str)] = &[
    (MessageType::GlobalOps, "ADL"),
    (MessageType::ChannelDescription, "CDS"),
    (MessageType::ChannelInvite, "CIU"),
    (MessageType::ChannelOps, "COL"),
    (MessageType::ConnectionCount, "CON"),
    (MessageType::Offline, "FLN"),
    (MessageType::FriendsList, "FRL"),
    (MessageType::Hello, "HLO"),
    (MessageType::InitialChannelData, "ICH"),
    (MessageType::Identify, "IDN"),
    (MessageType::IgnoreList, "IGN"),
    (MessageType::JoinChannel, "JCH"),
    (MessageType::CharacterList, "LIS"),
    (MessageType::ChannelMessage, "MSG"),
    (MessageType::Online, "NLN"),
    (MessageType::Ping, "PIN"),
    (MessageType::PrivateMessage, "PRI"),
    (MessageType::Status, "STA"),
    (MessageType::Typing, "TPN"),
    (MessageType::Variable, "VAR"),
];

impl MessageType {
    /// Returns the 3-letter wire code for this type.
    pub fn code(self) -> &'static str {
        match self {
            Self::GlobalOps => "ADL",
            Self::ChannelDescription => "CDS",
            Self::ChannelInvite => "CIU",
            Self::ChannelOps => "COL",
            Self::ConnectionCount => "CON",
            Self::Offline => "FLN",
            Self::FriendsList => "FRL",
            Self::Hello => "HLO",
            Self::InitialChannelData => "ICH",
            Self::Identify => "IDN",
            Self::IgnoreList => "IGN",
            Self::JoinChannel => "JCH",
            Self::CharacterList => "LIS",
            Self::ChannelMessage => "MSG",
            Self::Online => "NLN",
            Self::Ping => "PIN",
            Self::PrivateMessage => "PRI",
            Self::Status => "STA",
            Self::Typing => "TPN",
            Self::Variable => "VAR",
        }
    }

    /// Looks up a message type by its exact wire code.
    ///
    /// Returns `None` for codes the client doesn't know about.
    pub fn from_code(code: &str) -> Option<Self> {
        registry().lookup(code)
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Read-only map from wire code to [`MessageType`].
#[derive(Debug, Clone)]
pub struct MessageTypeRegistry {
    by_code: HashMap<&'static str, MessageType>,
}

impl MessageTypeRegistry {
    /// Builds a registry from a table of `(type, code)` pairs.
    ///
    /// # Errors
    /// Returns [`ProtocolError::DuplicateCode`] if any code appears more
    /// than once.
    pub fn from_table(
        table: &[(MessageType, &'static str)],
    ) -> Result<Self, ProtocolError> {
        let mut by_code = HashMap::with_capacity(table.len());
        for &(message_type, code) in table {
            if by_code.insert(code, message_type).is_some() {
                return Err(ProtocolError::DuplicateCode(code.to_string()));
            }
        }
        Ok(Self { by_code })
    }

    /// Looks up a code. Matching is exact and case-sensitive.
    pub fn lookup(&self, code: &str) -> Option<MessageType> {
        self.by_code.get(code).copied()
    }

    /// Number of registered codes.
    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    /// Returns `true` if the registry holds no codes.
    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

static REGISTRY: LazyLock<MessageTypeRegistry> = LazyLock::new(|| {
    MessageTypeRegistry::from_table(BUILTIN_TYPES)
        .expect("built-in message type table has a duplicate code")
});

/// Returns the process-wide registry of built-in message types.
///
/// The first call builds and validates the table. Call it once during
/// startup so a bad table stops the process before it connects.
pub fn registry() -> &'static MessageTypeRegistry {
    &REGISTRY
}
