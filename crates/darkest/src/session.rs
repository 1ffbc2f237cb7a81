//! Starting a session: connect, identify, rejoin, run.

use std::sync::Arc;

use darkest_login::Ticket;
use darkest_protocol::{CommandQueue, identify, join_channel};
use darkest_state::StateManager;
use darkest_transport::{Connection, TransportError, WebSocketConnection};
use tokio_util::sync::CancellationToken;

use crate::BotError;
use crate::config::BotConfig;
use crate::engine::SessionEngine;
use crate::outbox::Outbox;
use crate::router::MessageRouter;

/// Runs a session over an already-open connection.
///
/// Queues `IDN` with `ticket`, then `JCH` for the remembered room if
/// there is one, and runs the engine until the server closes the
/// connection or `cancel` fires.
///
/// # Errors
/// See [`SessionEngine::run`]. Building the first commands can also fail
/// with [`BotError::Protocol`].
pub async fn run_session<C>(
    connection: C,
    state: Arc<StateManager>,
    ticket: &Ticket,
    config: &BotConfig,
    cancel: &CancellationToken,
) -> Result<(), BotError>
where
    C: Connection<Error = TransportError>,
{
    let (sender, receiver) = CommandQueue::new();
    let outbox = Outbox::new(sender, Arc::clone(&state));

    outbox.send(identify(
        &ticket.account,
        &ticket.value,
        &config.character,
        &config.client_name,
        &config.client_version,
    )?)?;

    let room = state.read(|s| s.room_id.clone()).await;
    if let Some(room) = room.filter(|r| !r.is_empty()) {
        tracing::info!(%room, "rejoining room");
        outbox.send(join_channel(&room)?)?;
    }

    let router = MessageRouter::with_default_handlers(Arc::clone(&state), outbox);
    SessionEngine::new(connection, router, receiver, state, config.pacing)
        .run(cancel)
        .await
}

/// Connects to `config.server_url` and runs a session on it.
///
/// # Errors
/// [`BotError::Cancelled`] if `cancel` fires while connecting, a
/// transport error if the connection can't be made, otherwise whatever
/// [`run_session`] returns.
pub async fn connect_and_run(
    state: Arc<StateManager>,
    ticket: &Ticket,
    config: &BotConfig,
    cancel: &CancellationToken,
) -> Result<(), BotError> {
    tracing::info!(url = %config.server_url, "connecting");
    let connection = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(BotError::Cancelled),
        connection = WebSocketConnection::connect(&config.server_url) => connection?,
    };
    tracing::info!(character = %config.character, "connected");

    run_session(connection, state, ticket, config, cancel).await
}
