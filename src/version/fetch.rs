//! Fetch capability used by every resolver

use std::collections::BTreeMap;
use std::time::Duration;

#[cfg(test)]
use mockall::automock;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::redirect::Policy;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::{DEFAULT_FETCH_TIMEOUT_MS, USER_AGENT};
use crate::version::error::ResolveError;

/// Status code and payload of one fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl FetchResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body as JSON, reporting failures as [`ResolveError::Remote`].
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ResolveError> {
        serde_json::from_slice(&self.body)
            .map_err(|e| ResolveError::Remote(format!("invalid JSON payload: {}", e)))
    }
}

/// Trait for retrieving remote documents
///
/// Implementations must not retry and must not keep per-call state, so one
/// instance can be shared by every concurrent resolution.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `url`
    ///
    /// # Arguments
    /// * `url` - Absolute URL, query string included
    /// * `use_headers` - Return the response headers (as a JSON object) instead of the body
    ///
    /// # Returns
    /// * `Ok(FetchResponse)` - Any HTTP status, successful or not
    /// * `Err(ResolveError::Transport)` - If the request could not complete
    async fn fetch(&self, url: &str, use_headers: bool) -> Result<FetchResponse, ResolveError>;
}

/// [`Fetcher`] backed by shared `reqwest` clients
///
/// Header fetches never follow redirects, so a `Location` header naming the
/// download stays visible.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    head_client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, ResolveError> {
        let build = |policy: Policy| {
            Client::builder()
                .user_agent(USER_AGENT)
                .timeout(timeout)
                .redirect(policy)
                .build()
                .map_err(|e| ResolveError::Transport(format!("failed to build HTTP client: {}", e)))
        };
        Ok(Self {
            client: build(Policy::default())?,
            head_client: build(Policy::none())?,
        })
    }

    pub fn with_default_timeout() -> Result<Self, ResolveError> {
        Self::new(Duration::from_millis(DEFAULT_FETCH_TIMEOUT_MS))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str, use_headers: bool) -> Result<FetchResponse, ResolveError> {
        if use_headers {
            debug!("Fetching headers: {}", url);
            let response = self.head_client.head(url).send().await?;
            let headers: BTreeMap<String, String> = response
                .headers()
                .iter()
                .map(|(name, value)| {
                    (
                        name.as_str().to_string(),
                        String::from_utf8_lossy(value.as_bytes()).into_owned(),
                    )
                })
                .collect();
            let body = serde_json::to_vec(&headers)
                .map_err(|e| ResolveError::Transport(e.to_string()))?;
            return Ok(FetchResponse::new(response.status().as_u16(), body));
        }

        debug!("Fetching: {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        Ok(FetchResponse::new(status, body.to_vec()))
    }
}
