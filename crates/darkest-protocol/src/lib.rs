//! Wire protocol for Darkest.
//!
//! This crate defines the "language" the bot speaks with the chat server:
//!
//! - **Message types** ([`MessageType`], [`registry`]): the fixed set of
//!   3-letter codes and the validated lookup table.
//! - **Wire framing** ([`split_message`]): pulling the code and payload
//!   out of a raw text frame.
//! - **Payloads** ([`payloads`]): the JSON shapes each message carries,
//!   plus [`encode_payload`] / [`decode_payload`].
//! - **Commands** ([`Command`], [`ping`], [`channel_message`], ...) -
//!   outbound messages, with chat text cut to the server's byte limit.
//! - **Queue** ([`CommandQueue`]): the multi-producer FIFO the send loop
//!   drains.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw frames) and the bot
//! (routing and state). It doesn't know about sockets or the state file;
//! it only knows how messages look.
//!
//! ```text
//! Transport (text frames) → Protocol (code + payload) → Bot (handlers)
//! ```

// ---------------------------------------------------------------------------
// Module declarations
// ---------------------------------------------------------------------------

mod codec;
mod command;
mod error;
mod message_type;
pub mod payloads;
mod queue;
mod text;
mod wire;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use codec::{decode_payload, encode_payload};
pub use command::{
    Command, channel_message, identify, join_channel, ping, private_message,
};
pub use error::ProtocolError;
pub use message_type::{
    BUILTIN_TYPES, CODE_LEN, MessageType, MessageTypeRegistry, registry,
};
pub use queue::{CommandQueue, CommandReceiver, CommandSender};
pub use text::truncate_utf8_safe;
pub use wire::{PAYLOAD_OFFSET, RawMessage, split_message};
