//! HTTP suggestion service.
//!
//! This module provides [`HttpSuggestionService`], which posts the trip to a
//! text-generation endpoint and hands back the response body as it arrives.

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Url;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument, warn};

use crate::error::{Result, SuggestionError};
use crate::request::SuggestionRequest;
use crate::service::{ChunkStream, SuggestionService};

/// Suggestion service reached over HTTP with optional bearer authentication.
///
/// # Security
///
/// Tokens are stored using [`SecretString`] to prevent accidental logging
/// or exposure in debug output.
///
/// # Examples
///
/// ```no_run
/// use reqwest::Url;
/// use tripboard_planner::HttpSuggestionService;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let endpoint = Url::parse("http://localhost:3000/api/boards/plan")?;
/// let service = HttpSuggestionService::new(endpoint, None)?;
/// assert!(!service.is_authenticated());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct HttpSuggestionService {
    /// The underlying HTTP client.
    client: reqwest::Client,
    /// Where requests are posted.
    endpoint: Url,
    /// Bearer token, if any.
    token: Option<SecretString>,
}

impl HttpSuggestionService {
    /// Creates a new service for `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    #[instrument(skip(token), fields(endpoint = %endpoint, authenticated = token.is_some()))]
    pub fn new(endpoint: Url, token: Option<SecretString>) -> Result<Self> {
        debug!("creating suggestion client");
        let client = reqwest::Client::builder()
            .user_agent(concat!("tripboard/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            token,
        })
    }

    /// Returns the endpoint requests are posted to.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Returns whether requests carry a bearer token.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

#[async_trait]
impl SuggestionService for HttpSuggestionService {
    #[instrument(skip(self), fields(location = %request.location, days = request.days))]
    async fn open(&self, request: &SuggestionRequest) -> Result<ChunkStream> {
        let mut builder = self.client.post(self.endpoint.clone()).json(request);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token.expose_secret());
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "suggestion service rejected request");
            return Err(SuggestionError::RequestFailed {
                status: Some(status.as_u16()),
                reason: status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string(),
            });
        }

        debug!(status = status.as_u16(), "suggestion stream opened");
        Ok(response
            .bytes_stream()
            .map(|chunk| chunk.map_err(SuggestionError::from))
            .boxed())
    }
}
