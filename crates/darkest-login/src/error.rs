//! Error types for the login layer.

/// Errors that can occur while acquiring an API ticket.
///
/// Everything except [`Cancelled`](Self::Cancelled) is fatal to startup:
/// the bot can't identify without a ticket.
#[derive(Debug, thiserror::Error)]
pub enum TicketError {
    /// The HTTP request itself failed (DNS, connect, TLS, reading the body).
    ///
    /// Retried by the factory before it surfaces.
    #[error("ticket request failed: {0}")]
    Request(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The endpoint answered with a non-success status. For 5xx this is
    /// only returned once retries are used up.
    #[error("ticket endpoint returned HTTP {0}")]
    Status(u16),

    /// The response body wasn't the JSON we expect.
    #[error("ticket response is not valid json: {0}")]
    Parse(#[source] serde_json::Error),

    /// The response body was JSON `null`.
    #[error("ticket response was null")]
    NullResponse,

    /// The endpoint reported an error, e.g. a wrong password.
    #[error("ticket request rejected: {0}")]
    Rejected(String),

    /// The response had no error but no ticket either.
    #[error("ticket field was empty in ticket response")]
    MissingTicket,

    /// The cancellation token fired. Not a failure; the bot is shutting
    /// down.
    #[error("ticket acquisition cancelled")]
    Cancelled,
}

impl TicketError {
    /// Returns `true` for errors worth retrying: request failures and
    /// server-side (5xx) statuses.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Request(_) => true,
            Self::Status(status) => *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_transient_classifies_errors() {
        assert!(TicketError::Request("connection refused".into()).is_transient());
        assert!(TicketError::Status(503).is_transient());
        assert!(!TicketError::Status(404).is_transient());
        assert!(!TicketError::Rejected("Login failed.".into()).is_transient());
        assert!(!TicketError::MissingTicket.is_transient());
        assert!(!TicketError::Cancelled.is_transient());
    }
}
