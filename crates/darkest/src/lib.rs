//! # Darkest
//!
//! A chat bot for the F-Chat protocol that keeps a potion inventory for
//! the characters in its room.
//!
//! The crate ties the lower layers together:
//!
//! - [`MessageRouter`] dispatches inbound messages to [`MessageHandler`]s
//!   by type code, dropping the types the bot doesn't care about.
//! - [`commands`] holds the chat commands (`!listpotions`,
//!   `!drinkpotion`, ...) and the Dice Bot integration.
//! - [`SessionEngine`] runs the receive and send loops over one
//!   connection, pacing outbound traffic to the server's flood limit.
//! - [`connect_and_run`] is the whole session from connect to close.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use darkest::prelude::*;
//!
//! # async fn start(state: std::sync::Arc<StateManager>, ticket: Ticket) -> Result<(), BotError> {
//! let cancel = CancellationToken::new();
//! connect_and_run(state, &ticket, &BotConfig::default(), &cancel).await
//! # }
//! ```

pub mod commands;
mod config;
mod engine;
mod error;
pub mod handlers;
pub mod logging;
mod outbox;
mod router;
mod session;

pub use config::{BotConfig, PacingConfig};
pub use engine::SessionEngine;
pub use error::BotError;
pub use outbox::Outbox;
pub use router::{IGNORED_TYPES, MessageHandler, MessageRouter, RouteOutcome};
pub use session::{connect_and_run, run_session};

/// Everything needed to start the bot.
pub mod prelude {
    pub use crate::{BotConfig, BotError, PacingConfig, connect_and_run};
    pub use darkest_login::Ticket;
    pub use darkest_state::{StateConfig, StateManager};
    pub use tokio_util::sync::CancellationToken;
}
