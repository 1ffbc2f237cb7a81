//! Error types for the protocol layer.
//!
//! Each crate in Darkest defines its own error enum. When you see a
//! `ProtocolError`, the problem is in how a message was built or read,
//! not in the socket underneath or the state file on disk.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serializing a payload to JSON failed.
    #[error("encode failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// A payload string was not valid JSON for the expected shape.
    ///
    /// Common causes: malformed JSON, wrong field types, or a payload
    /// that belongs to a different message type.
    #[error("decode failed: {0}")]
    Decode(#[source] serde_json::Error),

    /// A payload decoded to JSON `null`.
    #[error("payload is null")]
    NullPayload,

    /// The raw message is too short to carry a 3-letter type code.
    #[error("message too short: {0:?}")]
    TooShort(String),

    /// The same code was registered twice in a message type table.
    #[error("message type {0} registered more than once")]
    DuplicateCode(String),

    /// The outgoing queue's consumer is gone; the session has ended.
    #[error("outgoing queue is closed")]
    QueueClosed,
}
