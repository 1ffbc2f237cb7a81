use std::sync::Arc;

use async_trait::async_trait;
use darkest_protocol::payloads::ChannelMessagePayload;
use darkest_state::StateManager;

use crate::BotError;
use crate::commands::{CommandMode, RoomResponder, UserCommandHandler};
use crate::handlers::{non_empty, parse_payload};
use crate::outbox::Outbox;
use crate::router::MessageHandler;

/// Passes chat from the bot's room to the user commands.
///
/// Messages from any other channel are logged and dropped.
pub struct ChannelMessageHandler {
    state: Arc<StateManager>,
    outbox: Outbox,
    commands: Arc<UserCommandHandler>,
}

impl ChannelMessageHandler {
    pub fn new(
        state: Arc<StateManager>,
        outbox: Outbox,
        commands: Arc<UserCommandHandler>,
    ) -> Self {
        Self {
            state,
            outbox,
            commands,
        }
    }
}

#[async_trait]
impl MessageHandler for ChannelMessageHandler {
    async fn handle(&self, payload: &str) -> Result<(), BotError> {
        let Some(parsed) = parse_payload::<ChannelMessagePayload>(payload) else {
            return Ok(());
        };

        let Some(channel) = non_empty(parsed.channel) else {
            tracing::warn!(%payload, "received a channel message with no channel");
            return Ok(());
        };
        let Some(message) = non_empty(parsed.message) else {
            tracing::warn!(%payload, "received an empty channel message");
            return Ok(());
        };
        let Some(character) = non_empty(parsed.character) else {
            tracing::warn!(%payload, "received a channel message with no sender");
            return Ok(());
        };

        if !self.state.read(|s| s.is_room(&channel)).await {
            tracing::warn!(%channel, "received a message from a strange channel");
            return Ok(());
        }

        let responder = RoomResponder::new(self.outbox.clone(), channel);
        self.commands
            .handle(CommandMode::Public, &character, &message, &responder)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use darkest_protocol::{CommandQueue, CommandReceiver};
    use darkest_state::PersistedState;

    fn handler_in_room(room: Option<&str>) -> (ChannelMessageHandler, CommandReceiver, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let persisted = PersistedState {
            room_id: room.map(str::to_string),
            ..PersistedState::default()
        };
        let state = Arc::new(StateManager::new(persisted, dir.path().join("state.json")));
        let (tx, rx) = CommandQueue::new();
        let commands = Arc::new(UserCommandHandler::new(Arc::clone(&state)));
        let handler = ChannelMessageHandler::new(state.clone(), Outbox::new(tx, state), commands);
        (handler, rx, dir)
    }

    #[tokio::test]
    async fn test_handle_room_command_replies_in_room() {
        let (handler, mut rx, _dir) = handler_in_room(Some("room1"));

        handler
            .handle(r#"{"channel":"room1","character":"Alice","message":"!listpotions"}"#)
            .await
            .unwrap();

        assert_eq!(
            rx.try_dequeue().unwrap().to_wire(),
            r#"MSG {"channel":"room1","message":"[user]Alice[/user] has no potions."}"#
        );
    }

    #[tokio::test]
    async fn test_handle_other_channel_is_dropped() {
        let (handler, mut rx, _dir) = handler_in_room(Some("room1"));

        handler
            .handle(r#"{"channel":"room2","character":"Alice","message":"!listpotions"}"#)
            .await
            .unwrap();

        assert!(rx.try_dequeue().is_none());
    }

    #[tokio::test]
    async fn test_handle_without_room_is_dropped() {
        let (handler, mut rx, _dir) = handler_in_room(None);

        handler
            .handle(r#"{"channel":"room1","character":"Alice","message":"!listpotions"}"#)
            .await
            .unwrap();

        assert!(rx.try_dequeue().is_none());
    }

    #[tokio::test]
    async fn test_handle_missing_fields_are_dropped() {
        let (handler, mut rx, _dir) = handler_in_room(Some("room1"));

        for payload in [
            r#"{"character":"Alice","message":"!listpotions"}"#,
            r#"{"channel":"room1","message":"!listpotions"}"#,
            r#"{"channel":"room1","character":"Alice","message":""}"#,
            "null",
        ] {
            handler.handle(payload).await.unwrap();
        }

        assert!(rx.try_dequeue().is_none());
    }
}
