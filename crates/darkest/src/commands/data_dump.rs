use std::sync::Arc;

use async_trait::async_trait;
use darkest_protocol::encode_payload;
use darkest_state::StateManager;

use crate::BotError;
use crate::commands::{ChatResponder, CommandMode, UserCommand, starts_with_ignore_case};

const COMMAND: &str = "!datadump";

/// `!datadump`: replies with the sender's stored record as JSON.
pub struct DataDumpCommand {
    state: Arc<StateManager>,
}

impl DataDumpCommand {
    pub fn new(state: Arc<StateManager>) -> Self {
        Self { state }
    }
}

#[async_trait]
impl UserCommand for DataDumpCommand {
    fn modes(&self) -> &'static [CommandMode] {
        &[CommandMode::Public, CommandMode::Private]
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

        let record = self.state.read(|s| s.characters.get(sender).cloned()).await;
        let reply = match record {
            Some(record) => encode_payload(&record)?,
            None => format!("No data found for [user]{sender}[/user]"),
        };
        responder.reply(&reply)?;
        Ok(())
    }
}
