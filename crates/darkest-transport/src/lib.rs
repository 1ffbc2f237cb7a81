//! Transport abstraction layer for Darkest.
//!
//! Provides the [`Connection`] trait that the session engine talks to. A
//! connection is one duplex, message-framed channel to the chat server:
//! text goes out as whole messages, and comes back in as a sequence of
//! [`Fragment`]s that the caller stitches together until it sees the
//! end-of-message marker.
//!
//! # Feature Flags
//!
//! - `websocket` (default): WebSocket client via `tokio-tungstenite`

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::WebSocketConnection;

/// One piece of an inbound message.
///
/// Servers may split a logical message over several frames. The receiver
/// concatenates `data` from consecutive fragments until one arrives with
/// `end_of_message` set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Raw bytes carried by this fragment.
    pub data: Vec<u8>,
    /// `true` if this fragment completes the current message.
    pub end_of_message: bool,
}

impl Fragment {
    /// Creates a fragment that completes a message on its own.
    pub fn complete(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            end_of_message: true,
        }
    }

    /// Creates a fragment that is followed by more data.
    pub fn partial(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            end_of_message: false,
        }
    }
}

/// A single duplex connection to the chat server.
pub trait Connection: Send + Sync + 'static {
    /// The error type for connection operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Sends one complete text message to the server.
    async fn send(&self, text: &str) -> Result<(), Self::Error>;

    /// Receives the next fragment from the server.
    ///
    /// Returns `Ok(None)` when the server closes the connection.
    async fn recv(&self) -> Result<Option<Fragment>, Self::Error>;

    /// Closes the connection from our side.
    async fn close(&self) -> Result<(), Self::Error>;

    /// Returns `true` while the connection can still carry traffic.
    fn is_open(&self) -> bool;
}
