//! Login for Darkest: turning account credentials into an API ticket.
//!
//! The chat server doesn't take passwords. The bot first trades its
//! credentials for a short-lived ticket over HTTP, then identifies on the
//! chat socket with that ticket.
//!
//! 1. **Credentials**: where the account and password come from
//!    ([`CredentialProvider`], [`FileCredentials`])
//! 2. **Endpoint**: the HTTP call ([`TicketEndpoint`],
//!    [`HttpTicketEndpoint`])
//! 3. **Factory**: cache, retry with jittered backoff, and parsing
//!    ([`TicketFactory`], [`RetryPolicy`], [`TicketCache`])
//!
//! # How it fits in the stack
//!
//! ```text
//! bot startup ──→ TicketFactory::get_ticket() ──→ Ticket
//!                                                   │
//!                                                   ▼
//!                               IDN command on the chat connection
//! ```

mod cache;
mod credentials;
mod endpoint;
mod error;
mod factory;
mod retry;

pub use cache::{TicketCache, TicketCacheEntry};
pub use credentials::{
    CredentialProvider, Credentials, DEFAULT_CREDENTIALS_FILE, FileCredentials,
    KEEP_CREDENTIALS_ENV,
};
pub use endpoint::{
    EndpointReply, HttpTicketEndpoint, TICKET_URL, TicketEndpoint, TicketResponse,
};
pub use error::TicketError;
pub use factory::{Ticket, TicketConfig, TicketFactory};
pub use retry::RetryPolicy;
