use std::sync::Arc;

use async_trait::async_trait;
use darkest_state::StateManager;

use crate::BotError;
use crate::commands::{ChatResponder, CommandMode, UserCommand, starts_with_ignore_case};

const COMMAND: &str = "!drinkpotion";

const USAGE: &str = "You need to specify a potion name! Use !listpotions to see what potions \
    you have, then drink it with !drinkpotion [b]<name>[/b].";

/// `!drinkpotion <name>`: removes one of the sender's potions.
pub struct DrinkPotionCommand {
    state: Arc<StateManager>,
}

impl DrinkPotionCommand {
    pub fn new(state: Arc<StateManager>) -> Self {
        Self { state }
    }
}

#[async_trait]
impl UserCommand for DrinkPotionCommand {
    fn modes(&self) -> &'static [CommandMode] {
        &[CommandMode::Public]
    }

    async fn try_execute(
        &self,
        sender: &str,
        message: &str,
        responder: &dyn ChatResponder,
    ) -> Result<(), BotError> {
        if !starts_with_ignore_case(message, COMMAND) {
            return Ok(());
        }

        // Everything after the first space, spaces included.
        let Some((_, potion_name)) = message.split_once(' ') else {
            responder.reply(USAGE)?;
            return Ok(());
        };

        let drunk = self
            .state
            .modify(|s| s.remove_potion(sender, potion_name))
            .await;

        let reply = match drunk {
            Some(potion) => format!(
                "[user]{sender}[/user] drinks their [eicon]{}[/eicon] [b]{}[/b] potion!",
                potion.eicon, potion.name
            ),
            None => format!("[user]{sender}[/user] does not have that potion."),
        };
        responder.reply(&reply)?;
        Ok(())
    }
}
