//! The session engine: one connection, two loops.
//!
//! ```text
//!                 ┌──────────────── receive loop ────────────────┐
//!   server ──→ recv fragments ──→ reassemble ──→ MessageRouter::route
//!                                                     │
//!                                           handlers queue commands
//!                                                     ▼
//!   server ←── send ←── try_dequeue ←──────────── CommandQueue
//!                 └──────────────── send loop ───────────────────┘
//!                        (sleeps a paced delay every cycle)
//! ```
//!
//! Both loops share a child of the caller's cancellation token. When the
//! receive loop ends for any reason it cancels the child, so the send loop
//! stops with it.

use std::sync::Arc;

use darkest_protocol::CommandReceiver;
use darkest_state::StateManager;
use darkest_transport::{Connection, TransportError};
use tokio_util::sync::CancellationToken;

use crate::BotError;
use crate::config::PacingConfig;
use crate::router::MessageRouter;

/// Drives one connected session until the server closes it, reading
/// fails, or the caller cancels.
pub struct SessionEngine<C> {
    connection: C,
    router: MessageRouter,
    receiver: CommandReceiver,
    state: Arc<StateManager>,
    pacing: PacingConfig,
}

impl<C> SessionEngine<C>
where
    C: Connection<Error = TransportError>,
{
    pub fn new(
        connection: C,
        router: MessageRouter,
        receiver: CommandReceiver,
        state: Arc<StateManager>,
        pacing: PacingConfig,
    ) -> Self {
        Self {
            connection,
            router,
            receiver,
            state,
            pacing,
        }
    }

    /// Runs both loops to completion.
    ///
    /// # Errors
    /// - [`BotError::Cancelled`] if `cancel` fired
    /// - [`BotError::Transport`] if reading from the connection failed
    ///
    /// A graceful close by the server returns `Ok(())`.
    pub async fn run(self, cancel: &CancellationToken) -> Result<(), BotError> {
        let Self {
            connection,
            router,
            receiver,
            state,
            pacing,
        } = self;

        let session = cancel.child_token();
        let (received, ()) = tokio::join!(
            receive_loop(&connection, &router, &session),
            send_loop(&connection, receiver, &state, pacing, &session),
        );
        received
    }
}

// ---------------------------------------------------------------------------
// Receive
// ---------------------------------------------------------------------------

async fn receive_loop<C>(
    connection: &C,
    router: &MessageRouter,
    session: &CancellationToken,
) -> Result<(), BotError>
where
    C: Connection<Error = TransportError>,
{
    // However this loop ends, the send loop ends too.
    let _stop_sending = session.clone().drop_guard();

    while connection.is_open() {
        let received = tokio::select! {
            biased;
            _ = session.cancelled() => return Err(BotError::Cancelled),
            received = read_message(connection) => received?,
        };

        let Some(text) = received else {
            tracing::info!("server closing connection gracefully");
            if let Err(e) = connection.close().await {
                tracing::debug!(error = %e, "error closing connection");
            }
            break;
        };

        tracing::trace!(message = %text, "received");
        if let Err(e) = router.route(&text).await {
            if e.is_cancelled() {
                return Err(e);
            }
            tracing::error!(error = %e, "error handling message");
        }
    }
    Ok(())
}

/// Reads fragments until one ends the message, then decodes the whole
/// message as UTF-8, replacing invalid sequences.
///
/// Returns `Ok(None)` once the server has closed the connection.
async fn read_message<C>(connection: &C) -> Result<Option<String>, TransportError>
where
    C: Connection<Error = TransportError>,
{
    let mut buffer = Vec::new();
    loop {
        let Some(fragment) = connection.recv().await? else {
            return Ok(None);
        };
        buffer.extend_from_slice(&fragment.data);
        if fragment.end_of_message {
            return Ok(Some(String::from_utf8_lossy(&buffer).into_owned()));
        }
    }
}

// ---------------------------------------------------------------------------
// Send
// ---------------------------------------------------------------------------

async fn send_loop<C>(
    connection: &C,
    mut receiver: CommandReceiver,
    state: &StateManager,
    pacing: PacingConfig,
    session: &CancellationToken,
) where
    C: Connection<Error = TransportError>,
{
    loop {
        if let Some(command) = receiver.try_dequeue() {
            let wire = command.to_wire();
            tracing::debug!(message = %wire, "sending");

            let sent = tokio::select! {
                biased;
                _ = session.cancelled() => break,
                sent = connection.send(&wire) => sent,
            };
            if let Err(e) = sent {
                if !connection.is_open() {
                    tracing::debug!(error = %e, "connection closed, send loop stopping");
                    break;
                }
                tracing::warn!(error = %e, "failed to send command");
            }
        }

        // The server can change its flood delay at any time.
        let delay = pacing.cycle_delay(state.transient().send_delay());
        tokio::select! {
            biased;
            _ = session.cancelled() => break,
            _ = tokio::time::sleep(delay) => {}
        }
    }
    tracing::debug!(unsent = receiver.len(), "send loop stopped");
}
