//! Dispatching inbound messages to handlers by type code.
//!
//! The router takes one raw text message at a time and decides what to
//! do with it:
//!
//! ```text
//! raw ──→ split code/payload ──→ known code? ──no──→ log "unknown", drop
//!                                     │yes
//!                                     ▼
//!                                 ignored? ──yes──→ drop silently
//!                                     │no
//!                                     ▼
//!                              handler registered? ──no──→ log, drop
//!                                     │yes
//!                                     ▼
//!                             handler.handle(payload)
//! ```
//!
//! Handlers are async so they can wait on the state gate, but most never
//! actually suspend. The caller awaits every handler the same way.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use darkest_protocol::{MessageType, split_message};
use darkest_state::StateManager;

use crate::BotError;
use crate::commands::UserCommandHandler;
use crate::handlers::{
    ChannelInviteHandler, ChannelMessageHandler, PingHandler, PrivateMessageHandler,
    VariableHandler,
};
use crate::outbox::Outbox;

/// Message types that carry nothing the bot acts on.
pub const IGNORED_TYPES: &[MessageType] = &[
    MessageType::Identify,           // our own name, echoed on connect
    MessageType::FriendsList,
    MessageType::ConnectionCount,
    MessageType::CharacterList,
    MessageType::Online,
    MessageType::Offline,
    MessageType::Status,
    MessageType::ChannelOps,
    MessageType::InitialChannelData,
    MessageType::ChannelDescription,
    MessageType::Hello,
    MessageType::IgnoreList,
    MessageType::GlobalOps,
    MessageType::Typing,
    MessageType::JoinChannel,        // someone joined a channel
];

/// Handles the payload of one message type.
///
/// Returning `Err` doesn't end the session; the engine logs it and reads
/// the next message. Malformed payloads should be logged and treated as
/// a no-op inside the handler, not returned as errors.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn handle(&self, payload: &str) -> Result<(), BotError>;
}

/// What the router did with a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Shorter than a type code.
    TooShort,
    /// The code isn't one we know.
    Unknown,
    /// Known but deliberately dropped.
    Ignored(MessageType),
    /// Known, not ignored, but nobody handles it.
    Unhandled(MessageType),
    /// Passed to a handler.
    Handled(MessageType),
}

/// Maps message types to handlers.
pub struct MessageRouter {
    handlers: HashMap<MessageType, Box<dyn MessageHandler>>,
    ignored: HashSet<MessageType>,
}

impl MessageRouter {
    /// A router with the standard ignore list and no handlers.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            ignored: IGNORED_TYPES.iter().copied().collect(),
        }
    }

    /// A router with every handler the bot uses registered.
    pub fn with_default_handlers(state: Arc<StateManager>, outbox: Outbox) -> Self {
        let commands = Arc::new(UserCommandHandler::new(Arc::clone(&state)));

        let mut router = Self::new();
        router.register(MessageType::Ping, PingHandler::new(outbox.clone()));
        router.register(MessageType::Variable, VariableHandler::new(Arc::clone(&state)));
        router.register(
            MessageType::ChannelInvite,
            ChannelInviteHandler::new(Arc::clone(&state), outbox.clone()),
        );
        router.register(
            MessageType::ChannelMessage,
            ChannelMessageHandler::new(Arc::clone(&state), outbox.clone(), Arc::clone(&commands)),
        );
        router.register(
            MessageType::PrivateMessage,
            PrivateMessageHandler::new(outbox, commands),
        );
        router
    }

    /// Registers `handler` for `message_type`, replacing any earlier one.
    pub fn register(
        &mut self,
        message_type: MessageType,
        handler: impl MessageHandler + 'static,
    ) {
        self.handlers.insert(message_type, Box::new(handler));
    }

    /// Returns `true` if `message_type` is on the ignore list.
    pub fn is_ignored(&self, message_type: MessageType) -> bool {
        self.ignored.contains(&message_type)
    }

    /// Routes one raw message.
    ///
    /// # Errors
    /// Whatever the handler returns. Routing itself never fails: short,
    /// unknown, ignored, and unhandled messages come back as `Ok`.
    pub async fn route(&self, raw: &str) -> Result<RouteOutcome, BotError> {
        let Ok(message) = split_message(raw) else {
            tracing::warn!(message = %raw, "received a message that is too short");
            return Ok(RouteOutcome::TooShort);
        };

        let Some(message_type) = MessageType::from_code(message.code) else {
            tracing::info!(message = %raw, "received unknown message type");
            return Ok(RouteOutcome::Unknown);
        };

        if self.is_ignored(message_type) {
            tracing::trace!(%message_type, "ignored message");
            return Ok(RouteOutcome::Ignored(message_type));
        }

        let Some(handler) = self.handlers.get(&message_type) else {
            tracing::info!(message = %raw, "message was not handled or ignored");
            return Ok(RouteOutcome::Unhandled(message_type));
        };

        tracing::debug!(%message_type, "dispatching message");
        handler.handle(message.payload).await?;
        Ok(RouteOutcome::Handled(message_type))
    }
}

impl Default for MessageRouter {
    fn default() -> Self {
        Self::new()
    }
}
