//! The on-disk ticket cache.
//!
//! Tickets live for about half an hour on the server side. Caching one
//! lets a quick restart skip the HTTP round trip (and skip needing the
//! credentials file at all).
//!
//! The file is JSON: `{"account": ..., "ticket": ..., "expirationTime": ...}`.
//! Anything unreadable is treated as "no cache" and deleted.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Ticket;

/// One cached ticket. Fields are optional because the file is outside our
/// control; [`usable_at`](Self::usable_at) decides whether it's good.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketCacheEntry {
    #[serde(default)]
    pub account: Option<String>,
    #[serde(default)]
    pub ticket: Option<String>,
    #[serde(default)]
    pub expiration_time: Option<DateTime<Utc>>,
}

impl TicketCacheEntry {
    pub fn new(ticket: &Ticket, expiration_time: DateTime<Utc>) -> Self {
        Self {
            account: Some(ticket.account.clone()),
            ticket: Some(ticket.value.clone()),
            expiration_time: Some(expiration_time),
        }
    }

    /// The cached ticket, if it hasn't expired by `now` and both the
    /// account and ticket are non-blank.
    pub fn usable_at(&self, now: DateTime<Utc>) -> Option<Ticket> {
        let expires = self.expiration_time?;
        if expires <= now {
            tracing::debug!(%expires, "cached ticket expired");
            return None;
        }

        let account = self.account.as_deref().unwrap_or_default();
        let ticket = self.ticket.as_deref().unwrap_or_default();
        if account.trim().is_empty() {
            tracing::error!("ticket cache had an empty account");
            return None;
        }
        if ticket.trim().is_empty() {
            tracing::error!("ticket cache had an empty ticket");
            return None;
        }
        Some(Ticket::new(account, ticket))
    }
}

/// Reads, writes, and deletes the cache file. I/O problems are logged,
/// never returned: a broken cache just means fetching a fresh ticket.
#[derive(Debug, Clone)]
pub struct TicketCache {
    path: PathBuf,
}

impl TicketCache {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the cache entry, if there's a readable one.
    ///
    /// A file that is `null` or not valid JSON is deleted.
    pub async fn load(&self) -> Option<TicketCacheEntry> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "ticket cache does not exist yet");
                return None;
            }
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "error reading ticket cache");
                return None;
            }
        };

        match serde_json::from_str::<Option<TicketCacheEntry>>(&text) {
            Ok(Some(entry)) => Some(entry),
            Ok(None) => {
                tracing::warn!(path = %self.path.display(), "read a null ticket cache");
                self.clear().await;
                None
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ticket cache is malformed");
                self.clear().await;
                None
            }
        }
    }

    /// Writes `entry` to the cache file.
    pub async fn store(&self, entry: &TicketCacheEntry) {
        let json = match serde_json::to_string(entry) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, "unable to encode ticket cache");
                return;
            }
        };
        match tokio::fs::write(&self.path, json).await {
            Ok(()) => tracing::info!(path = %self.path.display(), "ticket cached to file"),
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "unable to save ticket cache");
            }
        }
    }

    /// Deletes the cache file. A missing file is fine.
    pub async fn clear(&self) {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "error deleting ticket cache");
            }
        }
    }
}
