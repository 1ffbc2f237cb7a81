use std::fmt::Write as _;
use std::sync::Arc;

use async_trait::async_trait;
use darkest_state::StateManager;

use crate::BotError;
use crate::commands::{ChatResponder, CommandMode, UserCommand};

const COMMAND: &str = "!listpotions";

/// `!listpotions`: shows the sender's potions.
pub struct ListPotionsCommand {
    state: Arc<StateManager>,
}

impl ListPotionsCommand {
    pub fn new(state: Arc<StateManager>) -> Self {
        Self { state }
    }
}

#[async_trait]
impl UserCommand for ListPotionsCommand {
    fn modes(&self) -> &'static [CommandMode] {
        &[CommandMode::Public, CommandMode::Private]
    }

    async fn try_execute(
        &self,
        sender: &str,
        message: &str,
        responder: &dyn ChatResponder,
    ) -> Result<(), BotError> {
        if !message.eq_ignore_ascii_case(COMMAND) {
            return Ok(());
        }

        let listing = self
            .state
            .read(|s| {
                let potions = s.potions(sender);
                if potions.is_empty() {
                    return None;
                }

                let mut text = format!("[user]{sender}[/user]'s potions:");
                for potion in potions {
                    if potion.is_incomplete() {
                        tracing::warn!(character = %sender, "potion has missing data");
                    }
                    let _ = write!(
                        text,
                        "\n[eicon]{}[/eicon] [b]{}[/b]: {}",
                        potion.eicon, potion.name, potion.description
                    );
                }
                Some(text)
            })
            .await;

        let reply = listing.unwrap_or_else(|| format!("[user]{sender}[/user] has no potions."));
        responder.reply(&reply)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::*;
    use darkest_state::{PersistedState, Potion};

    #[tokio::test]
    async fn test_try_execute_no_record_says_no_potions() {
        let (state, _dir) = temp_state(PersistedState::default());
        let responder = RecordingResponder::default();

        ListPotionsCommand::new(state)
            .try_execute("Alice", "!ListPotions", &responder)
            .await
            .unwrap();

        assert_eq!(responder.replies(), vec!["[user]Alice[/user] has no potions."]);
    }

    #[tokio::test]
    async fn test_try_execute_lists_each_potion() {
        let mut persisted = PersistedState::default();
        persisted.add_potion("Alice", Potion::new("Fizz", "potion1", "Bubbly."));
        persisted.add_potion("Alice", Potion::new("Glow", "potion2", "Shiny."));
        let (state, _dir) = temp_state(persisted);
        let responder = RecordingResponder::default();

        ListPotionsCommand::new(state)
            .try_execute("Alice", "!listpotions", &responder)
            .await
            .unwrap();

        assert_eq!(
            responder.replies(),
            vec![
                "[user]Alice[/user]'s potions:\n\
                 [eicon]potion1[/eicon] [b]Fizz[/b]: Bubbly.\n\
                 [eicon]potion2[/eicon] [b]Glow[/b]: Shiny."
            ]
        );
    }

    #[tokio::test]
    async fn test_try_execute_requires_exact_command() {
        let (state, _dir) = temp_state(PersistedState::default());
        let responder = RecordingResponder::default();
        let command = ListPotionsCommand::new(state);

        command.try_execute("Alice", "!listpotions please", &responder).await.unwrap();
        command.try_execute("Alice", "hello", &responder).await.unwrap();

        assert!(responder.replies().is_empty());
    }
}
