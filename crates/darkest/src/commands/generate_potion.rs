use async_trait::async_trait;

use crate::BotError;
use crate::commands::{
    ChatResponder, CommandMode, PotionBuyers, UserCommand, starts_with_ignore_case,
};

const COMMAND: &str = "!generatepotion";

/// `!generatepotion`: remembers the sender as the next potion buyer.
///
/// Dice Bot handles the actual purchase; nothing is said here.
pub struct GeneratePotionCommand {
    buyers: PotionBuyers,
}

impl GeneratePotionCommand {
    pub fn new(buyers: PotionBuyers) -> Self {
        Self { buyers }
    }
}

#[async_trait]
impl UserCommand for GeneratePotionCommand {
    fn modes(&self) -> &'static [CommandMode] {
        &[CommandMode::Public]
    }

    async fn try_execute(
        &self,
        sender: &str,
        message: &str,
        _responder: &dyn ChatResponder,
    ) -> Result<(), BotError> {
        if starts_with_ignore_case(message, COMMAND) {
            tracing::info!(character = %sender, "wants to buy a potion");
            self.buyers.enqueue(sender);
        }
        Ok(())
    }
}
