//! Ticket acquisition: cache first, then the network with retries.
//!
//! ```text
//!            ┌─────────────┐  valid   ┌──────────────┐
//! start ───→ │ check cache │ ───────→ │ return cached│
//!            └─────────────┘          └──────────────┘
//!                   │ missing / expired
//!                   ▼
//!            ┌─────────────┐ transient failure (≤ max_retries)
//!            │  fetching   │ ←──────────────┐
//!            └─────────────┘ ───────────────┘
//!                   │ 2xx
//!                   ▼
//!            ┌─────────────┐          ┌──────────────┐
//!            │ parse reply │ ───────→ │ cache + return│
//!            └─────────────┘          └──────────────┘
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tokio_util::sync::CancellationToken;

use crate::retry::sleep_or_cancel;
use crate::{
    CredentialProvider, Credentials, EndpointReply, RetryPolicy, TicketCache,
    TicketCacheEntry, TicketEndpoint, TicketError, TicketResponse,
};

// ---------------------------------------------------------------------------
// Ticket
// ---------------------------------------------------------------------------

/// An API ticket and the account it was issued to.
#[derive(Clone, PartialEq, Eq)]
pub struct Ticket {
    pub account: String,
    pub value: String,
}

impl Ticket {
    pub fn new(account: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            value: value.into(),
        }
    }
}

impl fmt::Debug for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ticket")
            .field("account", &self.account)
            .field("value", &"<redacted>")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// TicketConfig
// ---------------------------------------------------------------------------

/// Configuration for [`TicketFactory`].
#[derive(Debug, Clone)]
pub struct TicketConfig {
    /// Where the cached ticket is stored.
    pub cache_path: PathBuf,

    /// How long a fetched ticket is trusted. Kept a little under the
    /// server's 30 minutes.
    pub cache_lifetime: Duration,

    /// Retry behavior for transient request failures.
    pub retry: RetryPolicy,
}

impl TicketConfig {
    pub fn cache_path(mut self, path: impl AsRef<Path>) -> Self {
        self.cache_path = path.as_ref().to_path_buf();
        self
    }

    pub fn cache_lifetime(mut self, lifetime: Duration) -> Self {
        self.cache_lifetime = lifetime;
        self
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

impl Default for TicketConfig {
    fn default() -> Self {
        Self {
            cache_path: PathBuf::from("ticket.json"),
            cache_lifetime: Duration::from_secs(28 * 60),
            retry: RetryPolicy::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// TicketFactory
// ---------------------------------------------------------------------------

/// Produces API tickets.
pub struct TicketFactory<E, P> {
    endpoint: E,
    credentials: P,
    cache: TicketCache,
    config: TicketConfig,
}

impl<E: TicketEndpoint, P: CredentialProvider> TicketFactory<E, P> {
    pub fn new(endpoint: E, credentials: P, config: TicketConfig) -> Self {
        Self {
            endpoint,
            credentials,
            cache: TicketCache::new(&config.cache_path),
            config,
        }
    }

    /// Returns a ticket, from the cache when a live one exists, otherwise
    /// from the endpoint.
    ///
    /// Returns `Ok(None)` when no credentials are available; the caller
    /// should stop. The credential provider is told to
    /// [`discard`](CredentialProvider::discard) on every path.
    ///
    /// # Errors
    /// - [`TicketError::Cancelled`]: `token` fired; nothing is wrapped
    /// - [`TicketError::Request`] / [`TicketError::Status`]: the request
    ///   kept failing after all retries, or failed non-transiently
    /// - [`TicketError::Parse`] / [`TicketError::NullResponse`]: the
    ///   reply wasn't usable JSON
    /// - [`TicketError::Rejected`]: the reply carried an `error`
    /// - [`TicketError::MissingTicket`]: the reply carried no ticket
    pub async fn get_ticket(
        &self,
        token: &CancellationToken,
    ) -> Result<Option<Ticket>, TicketError> {
        let result = self.acquire(token).await;
        self.credentials.discard().await;
        result
    }

    async fn acquire(
        &self,
        token: &CancellationToken,
    ) -> Result<Option<Ticket>, TicketError> {
        if token.is_cancelled() {
            return Err(TicketError::Cancelled);
        }

        if let Some(ticket) = self
            .cache
            .load()
            .await
            .and_then(|entry| entry.usable_at(Utc::now()))
        {
            tracing::info!(account = %ticket.account, "using cached ticket");
            return Ok(Some(ticket));
        }

        tracing::info!("retrieving new ticket");
        self.cache.clear().await;

        let Some(credentials) = self.credentials.credentials().await else {
            tracing::error!("unable to read credentials");
            return Ok(None);
        };

        let reply = self.request_with_retry(&credentials, token).await?;
        let ticket = parse_reply(&credentials.account, &reply)?;

        let entry = TicketCacheEntry::new(&ticket, self.expiry_from(Utc::now()));
        self.cache.store(&entry).await;

        Ok(Some(ticket))
    }

    /// Sends the request, retrying transient failures (request errors and
    /// 5xx) per the retry policy. Cancellation is checked before every
    /// attempt and interrupts in-flight requests and backoff sleeps.
    async fn request_with_retry(
        &self,
        credentials: &Credentials,
        token: &CancellationToken,
    ) -> Result<EndpointReply, TicketError> {
        let policy = self.config.retry;
        let mut retry = 0;

        loop {
            if token.is_cancelled() {
                return Err(TicketError::Cancelled);
            }

            let outcome = tokio::select! {
                biased;
                () = token.cancelled() => return Err(TicketError::Cancelled),
                outcome = self.endpoint.request(credentials) => outcome,
            };

            let reason = match &outcome {
                Ok(reply) if reply.status >= 500 => Some(format!("HTTP {}", reply.status)),
                Err(e) if e.is_transient() => Some(e.to_string()),
                _ => None,
            };
            let Some(reason) = reason else {
                return outcome;
            };

            if retry >= policy.max_retries {
                tracing::warn!(attempts = retry + 1, %reason, "ticket request out of retries");
                return outcome;
            }

            retry += 1;
            let delay = policy.delay(retry);
            tracing::warn!(
                retry,
                delay_ms = delay.as_millis() as u64,
                %reason,
                "ticket request failed, retrying"
            );
            sleep_or_cancel(delay, token).await?;
        }
    }

    fn expiry_from(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let lifetime =
            TimeDelta::from_std(self.config.cache_lifetime).unwrap_or(TimeDelta::zero());
        now.checked_add_signed(lifetime).unwrap_or(now)
    }
}

/// Turns a final endpoint reply into a ticket.
fn parse_reply(account: &str, reply: &EndpointReply) -> Result<Ticket, TicketError> {
    if !reply.is_success() {
        return Err(TicketError::Status(reply.status));
    }

    let parsed: Option<TicketResponse> =
        serde_json::from_str(&reply.body).map_err(TicketError::Parse)?;
    let response = parsed.ok_or(TicketError::NullResponse)?;

    if let Some(error) = response.error.filter(|e| !e.is_empty()) {
        return Err(TicketError::Rejected(error));
    }

    match response.ticket {
        Some(ticket) if !ticket.is_empty() => Ok(Ticket::new(account, ticket)),
        _ => Err(TicketError::MissingTicket),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reply_success_returns_ticket() {
        let reply = EndpointReply::new(200, r#"{"ticket":"abc","error":""}"#);
        let ticket = parse_reply("acct", &reply).unwrap();
        assert_eq!(ticket, Ticket::new("acct", "abc"));
    }

    #[test]
    fn test_parse_reply_error_field_is_rejected_even_with_ticket() {
        let reply = EndpointReply::new(200, r#"{"ticket":"abc","error":"Login failed."}"#);
        let result = parse_reply("acct", &reply);
        assert!(matches!(result, Err(TicketError::Rejected(ref e)) if e == "Login failed."));
    }

    #[test]
    fn test_parse_reply_missing_ticket() {
        for body in [r#"{"error":""}"#, r#"{"ticket":""}"#, "{}"] {
            let reply = EndpointReply::new(200, body);
            assert!(matches!(parse_reply("acct", &reply), Err(TicketError::MissingTicket)));
        }
    }

    #[test]
    fn test_parse_reply_null_and_garbage() {
        let reply = EndpointReply::new(200, "null");
        assert!(matches!(parse_reply("acct", &reply), Err(TicketError::NullResponse)));

        let reply = EndpointReply::new(200, "<html>");
        assert!(matches!(parse_reply("acct", &reply), Err(TicketError::Parse(_))));
    }

    #[test]
    fn test_parse_reply_non_success_status() {
        let reply = EndpointReply::new(403, r#"{"ticket":"abc"}"#);
        assert!(matches!(parse_reply("acct", &reply), Err(TicketError::Status(403))));
    }

    #[test]
    fn test_ticket_debug_hides_value() {
        let text = format!("{:?}", Ticket::new("acct", "secret-ticket"));
        assert!(!text.contains("secret-ticket"));
    }

    #[test]
    fn test_ticket_config_default() {
        let config = TicketConfig::default();
        assert_eq!(config.cache_lifetime, Duration::from_secs(1680));
        assert_eq!(config.retry.max_retries, 3);
        assert_eq!(config.cache_path, PathBuf::from("ticket.json"));
    }
}
