//! Bot state for Darkest.
//!
//! Two kinds of state live here:
//!
//! - **Persisted** ([`PersistedState`]): the room id and per-character
//!   records. Saved to a JSON file after every change.
//! - **Transient** ([`TransientState`]): limits the server negotiates at
//!   runtime (max chat bytes, send delay). Never saved.
//!
//! [`StateManager`] owns both and is the only thing that touches the
//! state file.

mod config;
mod error;
mod manager;
mod model;
mod transient;

pub use config::StateConfig;
pub use error::StateError;
pub use manager::StateManager;
pub use model::{Character, PersistedState, Potion};
pub use transient::{DEFAULT_MAX_CHAT_BYTES, TransientState};
