//! The producer side of the outgoing queue, with chat length limits.

use std::sync::Arc;

use darkest_protocol::{
    Command, CommandSender, ProtocolError, channel_message, private_message,
};
use darkest_state::StateManager;

/// What handlers use to send things.
///
/// Chat text is cut to the server's current `chat_max` at the moment it's
/// queued. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Outbox {
    sender: CommandSender,
    state: Arc<StateManager>,
}

impl Outbox {
    pub fn new(sender: CommandSender, state: Arc<StateManager>) -> Self {
        Self { sender, state }
    }

    /// Queues a ready-made command.
    pub fn send(&self, command: Command) -> Result<(), ProtocolError> {
        self.sender.send(command)
    }

    /// Queues a `MSG` to `channel`.
    pub fn channel_message(&self, channel: &str, text: &str) -> Result<(), ProtocolError> {
        let max = self.state.transient().max_chat_bytes();
        self.send(channel_message(channel, text, max)?)
    }

    /// Queues a `PRI` to `recipient`.
    pub fn private_message(&self, recipient: &str, text: &str) -> Result<(), ProtocolError> {
        let max = self.state.transient().max_chat_bytes();
        self.send(private_message(recipient, text, max)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use darkest_protocol::{CommandQueue, MessageType};
    use darkest_state::PersistedState;

    fn outbox() -> (Outbox, darkest_protocol::CommandReceiver, Arc<StateManager>) {
        let state = Arc::new(StateManager::new(PersistedState::default(), "unused.json"));
        let (tx, rx) = CommandQueue::new();
        (Outbox::new(tx, Arc::clone(&state)), rx, state)
    }

    #[test]
    fn test_channel_message_respects_negotiated_limit() {
        let (outbox, mut rx, state) = outbox();
        state.transient().set_max_chat_bytes(5);

        outbox.channel_message("room1", "éééé").unwrap();

        let command = rx.try_dequeue().unwrap();
        assert_eq!(command.message_type(), MessageType::ChannelMessage);
        assert_eq!(command.payload(), Some(r#"{"channel":"room1","message":"éé"}"#));
    }

    #[test]
    fn test_private_message_addresses_recipient() {
        let (outbox, mut rx, _state) = outbox();

        outbox.private_message("Alice", "hello").unwrap();

        let command = rx.try_dequeue().unwrap();
        assert_eq!(
            command.to_wire(),
            r#"PRI {"recipient":"Alice","message":"hello"}"#
        );
    }
}
