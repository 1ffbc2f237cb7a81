//! Reacting to Dice Bot, which sells the potions.

use std::sync::Arc;

use async_trait::async_trait;
use darkest_state::StateManager;

use crate::BotError;
use crate::commands::{ChatResponder, CommandMode, PotionBuyers, UserCommand, parse_potion};

/// The only character trusted to hand out potions.
pub const DICE_BOT: &str = "Dice Bot";

const REFUSAL_PREFIX: &str = "Failed: You could not afford to buy a potion for";

const LOST_TRACK: &str =
    "I don't know who bought that potion! I've lost track of the Dice Bot commands...";

/// Gives the potion in a Dice Bot purchase message to the oldest waiting
/// buyer.
pub struct DiceBotGivePotionCommand {
    buyers: PotionBuyers,
    state: Arc<StateManager>,
}

impl DiceBotGivePotionCommand {
    pub fn new(buyers: PotionBuyers, state: Arc<StateManager>) -> Self {
        Self { buyers, state }
    }
}

#[async_trait]
impl UserCommand for DiceBotGivePotionCommand {
    fn modes(&self) -> &'static [CommandMode] {
        &[CommandMode::Public]
    }

    async fn try_execute(
        &self,
        sender: &str,
        message: &str,
        responder: &dyn ChatResponder,
    ) -> Result<(), BotError> {
        if sender != DICE_BOT {
            return Ok(());
        }
        let Some(potion) = parse_potion(message) else {
            return Ok(());
        };

        let Some(buyer) = self.buyers.dequeue() else {
            tracing::warn!(potion = %potion.name, "don't know who bought a potion");
            responder.reply(LOST_TRACK)?;
            return Ok(());
        };

        tracing::info!(%buyer, potion = %potion.name, "bought a potion");
        responder.reply(&format!("[user]{buyer}[/user] has received: [b]{}[/b]", potion.name))?;
        self.state.modify(|s| s.add_potion(&buyer, potion)).await;
        Ok(())
    }
}

/// Drops the oldest waiting buyer when Dice Bot says they couldn't pay.
pub struct DiceBotRefusePotionCommand {
    buyers: PotionBuyers,
}

impl DiceBotRefusePotionCommand {
    pub fn new(buyers: PotionBuyers) -> Self {
        Self { buyers }
    }
}

#[async_trait]
impl UserCommand for DiceBotRefusePotionCommand {
    fn modes(&self) -> &'static [CommandMode] {
        &[CommandMode::Public]
    }

    async fn try_execute(
        &self,
        sender: &str,
        message: &str,
        _responder: &dyn ChatResponder,
    ) -> Result<(), BotError> {
        if sender != DICE_BOT || !message.starts_with(REFUSAL_PREFIX) {
            return Ok(());
        }

        match self.buyers.dequeue() {
            Some(buyer) => tracing::info!(character = %buyer, "cannot afford a potion"),
            None => tracing::warn!("don't know who can't afford a potion"),
        }
        Ok(())
    }
}
