use std::sync::Arc;

use async_trait::async_trait;
use darkest_protocol::join_channel;
use darkest_protocol::payloads::ChannelInvitePayload;
use darkest_state::StateManager;

use crate::BotError;
use crate::handlers::{non_empty, parse_payload};
use crate::outbox::Outbox;
use crate::router::MessageHandler;

/// Accepts every channel invite: the invited channel becomes the bot's
/// room and a `JCH` is queued for it.
///
/// Only one room is remembered, so a later invite replaces an earlier one.
pub struct ChannelInviteHandler {
    state: Arc<StateManager>,
    outbox: Outbox,
}

impl ChannelInviteHandler {
    pub fn new(state: Arc<StateManager>, outbox: Outbox) -> Self {
        Self { state, outbox }
    }
}

#[async_trait]
impl MessageHandler for ChannelInviteHandler {
    async fn handle(&self, payload: &str) -> Result<(), BotError> {
        let Some(invite) = parse_payload::<ChannelInvitePayload>(payload) else {
            return Ok(());
        };

        let Some(channel) = non_empty(invite.name) else {
            tracing::warn!(%payload, "channel invite has no channel name");
            return Ok(());
        };

        tracing::info!(
            title = invite.title.as_deref().unwrap_or_default(),
            sender = invite.sender.as_deref().unwrap_or_default(),
            %channel,
            "received a channel invite"
        );

        let room = channel.clone();
        self.state.modify(move |s| s.room_id = Some(room)).await;

        self.outbox.send(join_channel(&channel)?)?;
        Ok(())
    }
}
