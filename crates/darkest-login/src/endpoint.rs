//! The ticket HTTP endpoint.
//!
//! [`TicketEndpoint`] is the seam between the factory's retry/caching
//! logic and the network. Production uses [`HttpTicketEndpoint`]; tests
//! plug in a scripted fake.

use std::future::Future;

use serde::Deserialize;

use crate::{Credentials, TicketError};

/// The ticket endpoint on the F-List website.
pub const TICKET_URL: &str = "https://www.f-list.net/json/getApiTicket.php";

/// A raw HTTP reply: status code and body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointReply {
    pub status: u16,
    pub body: String,
}

impl EndpointReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The JSON the endpoint answers with. Both fields are optional; a
/// non-empty `error` means the request was refused.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TicketResponse {
    #[serde(default)]
    pub ticket: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Performs one ticket request. No retries; the factory handles those.
pub trait TicketEndpoint: Send + Sync {
    /// Sends the request. Transport failures are
    /// [`TicketError::Request`]; any HTTP status, including 5xx, comes
    /// back as `Ok` so the caller can decide whether to retry.
    fn request(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<EndpointReply, TicketError>> + Send;
}

/// Form-POSTs credentials to the ticket URL with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTicketEndpoint {
    client: reqwest::Client,
    url: String,
}

impl HttpTicketEndpoint {
    /// An endpoint pointing at [`TICKET_URL`].
    ///
    /// # Errors
    /// Returns [`TicketError::Request`] if the HTTP client can't be built
    /// (for example, no TLS backend).
    pub fn new() -> Result<Self, TicketError> {
        Self::with_url(TICKET_URL)
    }

    /// An endpoint pointing at a custom URL.
    pub fn with_url(url: impl Into<String>) -> Result<Self, TicketError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| TicketError::Request(Box::new(e)))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl TicketEndpoint for HttpTicketEndpoint {
    async fn request(
        &self,
        credentials: &Credentials,
    ) -> Result<EndpointReply, TicketError> {
        // The no_* flags drop the character, friend, and bookmark lists
        // from the response; only the ticket is needed.
        let form = [
            ("account", credentials.account.as_str()),
            ("password", credentials.password.as_str()),
            ("no_characters", "true"),
            ("no_friends", "true"),
            ("no_bookmarks", "true"),
        ];

        let response = self
            .client
            .post(&self.url)
            .form(&form)
            .send()
            .await
            .map_err(|e| TicketError::Request(Box::new(e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TicketError::Request(Box::new(e)))?;

        tracing::debug!(status, bytes = body.len(), "ticket endpoint replied");
        Ok(EndpointReply { status, body })
    }
}
