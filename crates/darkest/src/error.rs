//! Unified error type for the Darkest bot.

use darkest_login::TicketError;
use darkest_protocol::ProtocolError;
use darkest_state::StateError;
use darkest_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attributes let `?` convert sub-crate errors
/// automatically. Ticket errors are the exception: a cancelled ticket
/// request becomes [`BotError::Cancelled`] rather than being wrapped, so
/// callers check for cancellation in one place.
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    /// Connecting, reading, or writing the chat connection failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Building or queueing a command failed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Loading the state file failed.
    #[error(transparent)]
    State(#[from] StateError),

    /// Getting an API ticket failed.
    #[error(transparent)]
    Ticket(TicketError),

    /// No credentials were available, so no ticket could be requested.
    #[error("no credentials available to request a ticket")]
    NoCredentials,

    /// The shutdown signal fired.
    #[error("cancelled")]
    Cancelled,
}

impl From<TicketError> for BotError {
    fn from(err: TicketError) -> Self {
        match err {
            TicketError::Cancelled => Self::Cancelled,
            other => Self::Ticket(other),
        }
    }
}

impl BotError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::ConnectionClosed("gone".into());
        let bot_err: BotError = err.into();
        assert!(matches!(bot_err, BotError::Transport(_)));
        assert!(bot_err.to_string().contains("gone"));
    }

    #[test]
    fn test_from_protocol_error() {
        let bot_err: BotError = ProtocolError::QueueClosed.into();
        assert!(matches!(bot_err, BotError::Protocol(_)));
    }

    #[test]
    fn test_from_ticket_error_wraps_failures() {
        let bot_err: BotError = TicketError::MissingTicket.into();
        assert!(matches!(bot_err, BotError::Ticket(TicketError::MissingTicket)));
    }

    #[test]
    fn test_from_ticket_cancelled_is_not_wrapped() {
        let bot_err: BotError = TicketError::Cancelled.into();
        assert!(bot_err.is_cancelled());
    }
}
