//! Chat commands users (and Dice Bot) trigger by talking to the bot.
//!
//! Every room or private message is offered to every [`UserCommand`]
//! that allows the mode it arrived in. Each command decides for itself
//! whether the text is meant for it, so one message can trigger more than
//! one command, though in practice the prefixes don't overlap.
//!
//! Replies go through a [`ChatResponder`], which knows whether to answer
//! in the room or privately.

mod data_dump;
mod dice_bot;
mod drink_potion;
mod generate_potion;
mod list_potions;
mod potion;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use darkest_protocol::ProtocolError;
use darkest_state::StateManager;

use crate::BotError;
use crate::outbox::Outbox;

pub use data_dump::DataDumpCommand;
pub use dice_bot::{DICE_BOT, DiceBotGivePotionCommand, DiceBotRefusePotionCommand};
pub use drink_potion::DrinkPotionCommand;
pub use generate_potion::GeneratePotionCommand;
pub use list_potions::ListPotionsCommand;
pub use potion::parse_potion;

// ---------------------------------------------------------------------------
// Modes and responders
// ---------------------------------------------------------------------------

/// Where a message came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandMode {
    /// Said in the bot's room.
    Public,
    /// Sent to the bot privately.
    Private,
}

/// Sends a reply back to wherever a command came from.
pub trait ChatResponder: Send + Sync {
    fn reply(&self, text: &str) -> Result<(), ProtocolError>;
}

/// Replies with a `MSG` to the room.
pub struct RoomResponder {
    outbox: Outbox,
    channel: String,
}

impl RoomResponder {
    pub fn new(outbox: Outbox, channel: impl Into<String>) -> Self {
        Self {
            outbox,
            channel: channel.into(),
        }
    }
}

impl ChatResponder for RoomResponder {
    fn reply(&self, text: &str) -> Result<(), ProtocolError> {
        self.outbox.channel_message(&self.channel, text)
    }
}

/// Replies with a `PRI` to the character who wrote to us.
pub struct PrivateResponder {
    outbox: Outbox,
    recipient: String,
}

impl PrivateResponder {
    pub fn new(outbox: Outbox, recipient: impl Into<String>) -> Self {
        Self {
            outbox,
            recipient: recipient.into(),
        }
    }
}

impl ChatResponder for PrivateResponder {
    fn reply(&self, text: &str) -> Result<(), ProtocolError> {
        self.outbox.private_message(&self.recipient, text)
    }
}

// ---------------------------------------------------------------------------
// Potion buyers
// ---------------------------------------------------------------------------

/// Characters waiting for Dice Bot to hand over a potion, oldest first.
///
/// Dice Bot's replies don't say who they're for, so each reply is paired
/// with whoever asked first. If Dice Bot answers out of order, or a
/// request never reaches it, the pairing goes wrong and stays wrong until
/// the queue drains.
#[derive(Debug, Clone, Default)]
pub struct PotionBuyers {
    queue: Arc<Mutex<VecDeque<String>>>,
}

impl PotionBuyers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&self, character: impl Into<String>) {
        self.lock().push_back(character.into());
    }

    pub fn dequeue(&self) -> Option<String> {
        self.lock().pop_front()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<String>> {
        // A plain VecDeque can't be left half-updated, so poisoning is harmless.
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ---------------------------------------------------------------------------
// UserCommand
// ---------------------------------------------------------------------------

/// One chat command.
///
/// `try_execute` is called for every message in an allowed mode; it
/// returns `Ok(())` without doing anything when the message isn't for it.
#[async_trait]
pub trait UserCommand: Send + Sync {
    /// The modes this command answers in.
    fn modes(&self) -> &'static [CommandMode];

    async fn try_execute(
        &self,
        sender: &str,
        message: &str,
        responder: &dyn ChatResponder,
    ) -> Result<(), BotError>;
}

/// Offers each message to every command allowed in its mode, in
/// registration order.
pub struct UserCommandHandler {
    commands: Vec<Box<dyn UserCommand>>,
}

impl UserCommandHandler {
    /// The bot's full command set, sharing one potion-buyer queue.
    pub fn new(state: Arc<StateManager>) -> Self {
        let buyers = PotionBuyers::new();
        Self::with_commands(vec![
            Box::new(ListPotionsCommand::new(Arc::clone(&state))),
            Box::new(DrinkPotionCommand::new(Arc::clone(&state))),
            Box::new(DataDumpCommand::new(Arc::clone(&state))),
            Box::new(GeneratePotionCommand::new(buyers.clone())),
            Box::new(DiceBotRefusePotionCommand::new(buyers.clone())),
            Box::new(DiceBotGivePotionCommand::new(buyers, state)),
        ])
    }

    pub fn with_commands(commands: Vec<Box<dyn UserCommand>>) -> Self {
        Self { commands }
    }

    /// Runs every command that allows `mode` against one message.
    ///
    /// # Errors
    /// Stops at the first command that fails to queue its reply.
    pub async fn handle(
        &self,
        mode: CommandMode,
        sender: &str,
        message: &str,
        responder: &dyn ChatResponder,
    ) -> Result<(), BotError> {
        for command in &self.commands {
            if command.modes().contains(&mode) {
                command.try_execute(sender, message, responder).await?;
            }
        }
        Ok(())
    }
}

/// Case-insensitive (ASCII) prefix test that can't slice inside a
/// character.
pub(crate) fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Collects replies instead of sending them.
    #[derive(Default)]
    pub struct RecordingResponder {
        pub replies: Mutex<Vec<String>>,
    }

    impl RecordingResponder {
        pub fn replies(&self) -> Vec<String> {
            self.replies.lock().unwrap().clone()
        }
    }

    impl ChatResponder for RecordingResponder {
        fn reply(&self, text: &str) -> Result<(), ProtocolError> {
            self.replies.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    /// A state manager backed by a file in a fresh temp dir.
    pub fn temp_state(
        state: darkest_state::PersistedState,
    ) -> (Arc<StateManager>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let manager = StateManager::new(state, dir.path().join("state.json"));
        (Arc::new(manager), dir)
    }
}
