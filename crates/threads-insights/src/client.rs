//! HTTP client for the Threads Graph API.
//!
//! Wraps `reqwest` with endpoint URL building, bearer authentication, and
//! typed response decoding. Endpoint operations live in sibling modules
//! (`token`, `insights`, `threads`, `merge`) as further `impl` blocks.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use threads_core::ThreadsConfig;

use crate::error::ThreadsError;

/// Client for the Threads Graph API.
///
/// Holds no token state: every authenticated call takes the bearer token as
/// an argument, so one client can serve several accounts. Use
/// [`ThreadsClient::new`] with a [`ThreadsConfig`], or
/// [`ThreadsClient::with_base_url`] to point at a mock server in tests.
pub struct ThreadsClient {
    pub(crate) client: Client,
    pub(crate) base_url: Url,
    pub(crate) client_id: Option<String>,
    pub(crate) client_secret: Option<String>,
    pub(crate) redirect_uri: String,
    pub(crate) max_pages: usize,
    pub(crate) page_limit: u32,
}

impl ThreadsClient {
    /// Creates a client from an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ThreadsError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ThreadsError::InvalidUrl`] if the
    /// configured base URL does not parse.
    pub fn new(config: &ThreadsConfig) -> Result<Self, ThreadsError> {
        let mut builder = Client::builder().user_agent(config.user_agent.as_str());
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        // Exactly one trailing slash, so endpoint segments append to the
        // base path instead of replacing its last segment.
        let normalised = format!("{}/", config.base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ThreadsError::InvalidUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ThreadsError::InvalidUrl {
                url: config.base_url.clone(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }

        Ok(Self {
            client,
            base_url,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
            max_pages: config.max_pages.max(1),
            page_limit: config.page_limit,
        })
    }

    /// Creates a client from `.env` and the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ThreadsError::Config`] if an env var is malformed, plus any
    /// error from [`ThreadsClient::new`].
    pub fn from_env() -> Result<Self, ThreadsError> {
        let config = threads_core::load_config()?;
        Self::new(&config)
    }

    /// Creates a client with default settings against a custom base URL
    /// (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// See [`ThreadsClient::new`].
    pub fn with_base_url(base_url: &str) -> Result<Self, ThreadsError> {
        Self::new(&ThreadsConfig::default().with_base_url(base_url))
    }

    /// Pages followed by one pagination run before it gives up.
    #[must_use]
    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    /// Page size used by [`ThreadsClient::fetch_all_threads`] when the caller
    /// does not pass one.
    #[must_use]
    pub fn page_limit(&self) -> u32 {
        self.page_limit
    }

    /// Builds an endpoint URL from path segments and query parameters.
    ///
    /// Segments are percent-encoded individually, so a media id can never
    /// escape its path position.
    pub(crate) fn build_url(
        &self,
        segments: &[&str],
        params: &[(&str, &str)],
    ) -> Result<Url, ThreadsError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ThreadsError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);

        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    /// Sends a request and returns the HTTP status with the raw body text.
    ///
    /// Status handling is left to the caller since each endpoint maps a
    /// non-200 response to its own error.
    ///
    /// # Errors
    ///
    /// Returns [`ThreadsError::Http`] on network failure.
    pub(crate) async fn send(
        &self,
        request: RequestBuilder,
    ) -> Result<(StatusCode, String), ThreadsError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        Ok((status, body))
    }

    /// Sends an authenticated GET to `url`.
    pub(crate) async fn get_with_token(
        &self,
        url: Url,
        access_token: &str,
    ) -> Result<(StatusCode, String), ThreadsError> {
        tracing::debug!(path = url.path(), "threads api GET");
        let request = self.client.get(url).bearer_auth(access_token);
        self.send(request).await
    }

    /// Parses a response body into `T`.
    pub(crate) fn decode<T: DeserializeOwned>(body: &str, context: &str) -> Result<T, ThreadsError> {
        serde_json::from_str(body).map_err(|e| ThreadsError::Deserialize {
            context: context.to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
