use std::sync::Arc;

use async_trait::async_trait;
use darkest_protocol::payloads::PrivateMessagePayload;

use crate::BotError;
use crate::commands::{CommandMode, PrivateResponder, UserCommandHandler};
use crate::handlers::{non_empty, parse_payload};
use crate::outbox::Outbox;
use crate::router::MessageHandler;

/// Passes private messages to the user commands; replies go back to the
/// sender privately.
pub struct PrivateMessageHandler {
    outbox: Outbox,
    commands: Arc<UserCommandHandler>,
}

impl PrivateMessageHandler {
    pub fn new(outbox: Outbox, commands: Arc<UserCommandHandler>) -> Self {
        Self { outbox, commands }
    }
}

#[async_trait]
impl MessageHandler for PrivateMessageHandler {
    async fn handle(&self, payload: &str) -> Result<(), BotError> {
        let Some(parsed) = parse_payload::<PrivateMessagePayload>(payload) else {
            return Ok(());
        };

        let Some(message) = non_empty(parsed.message) else {
            tracing::warn!(%payload, "received an empty private message");
            return Ok(());
        };
        let Some(character) = non_empty(parsed.character) else {
            tracing::warn!(%payload, "received a private message with no sender");
            return Ok(());
        };

        let responder = PrivateResponder::new(self.outbox.clone(), character.clone());
        self.commands
            .handle(CommandMode::Private, &character, &message, &responder)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use darkest_protocol::{CommandQueue, CommandReceiver};
    use darkest_state::{PersistedState, StateManager};

    fn handler() -> (PrivateMessageHandler, CommandReceiver, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let state = Arc::new(StateManager::new(
            PersistedState::seeded(&["Aller the Fox"]),
            dir.path().join("state.json"),
        ));
        let (tx, rx) = CommandQueue::new();
        let commands = Arc::new(UserCommandHandler::new(Arc::clone(&state)));
        (PrivateMessageHandler::new(Outbox::new(tx, state), commands), rx, dir)
    }

    #[tokio::test]
    async fn test_handle_replies_privately() {
        let (handler, mut rx, _dir) = handler();

        handler
            .handle(r#"{"character":"Aller the Fox","message":"!datadump"}"#)
            .await
            .unwrap();

        assert_eq!(
            rx.try_dequeue().unwrap().to_wire(),
            r#"PRI {"recipient":"Aller the Fox","message":"{\"IsOp\":true,\"Potions\":[]}"}"#
        );
    }

    #[tokio::test]
    async fn test_handle_public_only_command_is_ignored() {
        let (handler, mut rx, _dir) = handler();

        handler
            .handle(r#"{"character":"Alice","message":"!drinkpotion Fizz"}"#)
            .await
            .unwrap();

        assert!(rx.try_dequeue().is_none());
    }

    #[tokio::test]
    async fn test_handle_missing_sender_is_dropped() {
        let (handler, mut rx, _dir) = handler();

        handler.handle(r#"{"message":"!listpotions"}"#).await.unwrap();

        assert!(rx.try_dequeue().is_none());
    }
}
