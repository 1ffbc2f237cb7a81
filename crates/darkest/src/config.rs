//! Bot configuration.

use std::time::Duration;

// ---------------------------------------------------------------------------
// PacingConfig
// ---------------------------------------------------------------------------

/// Client-side floor for the send loop's cadence.
///
/// Each cycle waits `max(server delay, min_send_interval) + padding`, so
/// the bot stays under the server's flood limit even before the server
/// has announced one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingConfig {
    /// Lower bound on the gap between sends.
    pub min_send_interval: Duration,

    /// Added on top of every gap.
    pub padding: Duration,
}

impl PacingConfig {
    /// The wait after one send cycle, given the server's current
    /// `msg_flood` delay.
    pub fn cycle_delay(&self, server_delay: Duration) -> Duration {
        server_delay.max(self.min_send_interval) + self.padding
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            min_send_interval: Duration::from_secs(1),
            padding: Duration::from_millis(700),
        }
    }
}

// ---------------------------------------------------------------------------
// BotConfig
// ---------------------------------------------------------------------------

/// Who the bot is and where it connects.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Chat server WebSocket URL.
    pub server_url: String,

    /// Character to log in as.
    pub character: String,

    /// Client name sent with `IDN`.
    pub client_name: String,

    /// Client version sent with `IDN`.
    pub client_version: String,

    pub pacing: PacingConfig,
}

impl BotConfig {
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = url.into();
        self
    }

    pub fn character(mut self, character: impl Into<String>) -> Self {
        self.character = character.into();
        self
    }

    pub fn pacing(mut self, pacing: PacingConfig) -> Self {
        self.pacing = pacing;
        self
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            server_url: "wss://chat.f-list.net/chat2".to_string(),
            character: "Darkest Bot".to_string(),
            client_name: "DarkestBot".to_string(),
            client_version: "0.0.1".to_string(),
            pacing: PacingConfig::default(),
        }
    }
}
