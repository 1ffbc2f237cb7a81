use std::sync::Arc;

use async_trait::async_trait;
use darkest_protocol::payloads::VarPayload;
use darkest_state::StateManager;
use serde_json::Value;

use crate::BotError;
use crate::handlers::{non_empty, parse_payload};
use crate::router::MessageHandler;

/// Longest chat message the server accepts, in bytes.
pub const CHAT_MAX_VAR: &str = "chat_max";

/// Seconds the server wants between our messages.
pub const MESSAGE_DELAY_VAR: &str = "msg_flood";

/// Applies the server variables that shape what and how fast we send.
///
/// Everything else the server announces is ignored.
pub struct VariableHandler {
    state: Arc<StateManager>,
}

impl VariableHandler {
    pub fn new(state: Arc<StateManager>) -> Self {
        Self { state }
    }

    fn apply_chat_max(&self, value: &Value) {
        let Some(bytes) = value.as_u64().and_then(|v| usize::try_from(v).ok()) else {
            tracing::warn!(variable = CHAT_MAX_VAR, %value, "unable to parse integer");
            return;
        };
        self.state.transient().set_max_chat_bytes(bytes);
        tracing::info!(bytes, "max channel message length");
    }

    fn apply_message_delay(&self, value: &Value) {
        let delay = value
            .as_f64()
            .and_then(|secs| self.state.transient().set_send_delay_secs(secs));
        match delay {
            Some(delay) => tracing::info!(?delay, "message delay duration"),
            None => {
                tracing::warn!(variable = MESSAGE_DELAY_VAR, %value, "unable to parse delay")
            }
        }
    }
}

#[async_trait]
impl MessageHandler for VariableHandler {
    async fn handle(&self, payload: &str) -> Result<(), BotError> {
        let Some(parsed) = parse_payload::<VarPayload>(payload) else {
            return Ok(());
        };

        let Some(variable) = non_empty(parsed.variable) else {
            tracing::error!(%payload, "got a variable with no name");
            return Ok(());
        };

        if variable != CHAT_MAX_VAR && variable != MESSAGE_DELAY_VAR {
            tracing::debug!(%variable, "ignoring server variable");
            return Ok(());
        }

        let value = match parsed.value {
            Some(Value::Null) | None => {
                tracing::warn!(%variable, "variable has a null value");
                return Ok(());
            }
            Some(value) => value,
        };

        if variable == CHAT_MAX_VAR {
            self.apply_chat_max(&value);
        } else {
            self.apply_message_delay(&value);
        }
        Ok(())
    }
}
