use async_trait::async_trait;
use darkest_protocol::ping;

use crate::BotError;
use crate::outbox::Outbox;
use crate::router::MessageHandler;

/// Answers the server's keep-alive `PIN` with a `PIN` of our own.
pub struct PingHandler {
    outbox: Outbox,
}

impl PingHandler {
    pub fn new(outbox: Outbox) -> Self {
        Self { outbox }
    }
}

#[async_trait]
impl MessageHandler for PingHandler {
    async fn handle(&self, _payload: &str) -> Result<(), BotError> {
        self.outbox.send(ping())?;
        Ok(())
    }
}
