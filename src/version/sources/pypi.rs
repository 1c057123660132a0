//! PyPI source for fetching Python package releases

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::version::descriptor::SourceKind;
use crate::version::error::ResolveError;
use crate::version::evr::Version;
use crate::version::fetch::Fetcher;
use crate::version::source::{SourceResolver, parse_candidates};

/// PyPI source
pub struct PypiSource {
    name: String,
    base_url: String,
}

impl PypiSource {
    pub fn new(name: &str, base_url: &str) -> Self {
        Self {
            name: name.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

/// PyPI JSON API response structure
#[derive(Debug, Deserialize)]
struct PypiResponse {
    /// Keyed by release identifier, in document order
    releases: IndexMap<String, serde_json::Value>,
}

#[async_trait]
impl SourceResolver for PypiSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Pypi
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn resolve(&self, fetcher: &dyn Fetcher) -> Result<Vec<Version>, ResolveError> {
        let url = format!("{}/pypi/{}/json", self.base_url, self.name);
        debug!("Fetching PyPI package: {}", url);

        let response = fetcher.fetch(&url, false).await?;

        if response.status == 404 {
            return Err(ResolveError::NotFound(format!("{} in PyPI", self.name)));
        }

        if !response.is_success() {
            warn!("PyPI returned status {}: {}", response.status, url);
            return Err(ResolveError::Remote(format!(
                "PyPI API returned status {}",
                response.status
            )));
        }

        let pypi_response: PypiResponse = response.json()?;

        parse_candidates(
            &format!("{} in PyPI", self.name),
            pypi_response.releases.keys(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::evr::latest;
    use crate::version::fetch::HttpFetcher;
    use mockito::Server;

    #[tokio::test]
    async fn resolve_returns_versions_from_releases() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/pypi/requests/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "info": {"version": "2.32.5"},
                    "releases": {
                        "2.31.0": [],
                        "2.32.5": [],
                        "2.32.0": []
                    }
                }"#,
            )
            .create_async()
            .await;

        let source = PypiSource::new("requests", &server.url());
        let fetcher = HttpFetcher::with_default_timeout().unwrap();
        let versions = source.resolve(&fetcher).await.unwrap();

        mock.assert_async().await;
        let raw: Vec<_> = versions.iter().map(|v| v.as_str()).collect();
        assert_eq!(raw, vec!["2.31.0", "2.32.5", "2.32.0"]);
        assert_eq!(latest(versions).unwrap().as_str(), "2.32.5");
    }

    #[tokio::test]
    async fn resolve_returns_not_found_for_missing_package() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/pypi/nonexistent/json")
            .with_status(404)
            .create_async()
            .await;

        let source = PypiSource::new("nonexistent", &server.url());
        let fetcher = HttpFetcher::with_default_timeout().unwrap();
        let result = source.resolve(&fetcher).await;

        mock.assert_async().await;
        assert!(matches!(result, Err(ResolveError::NotFound(_))));
    }

    #[tokio::test]
    async fn resolve_returns_not_found_without_releases() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/pypi/empty/json")
            .with_status(200)
            .with_body(r#"{"info": {"version": ""}, "releases": {}}"#)
            .create_async()
            .await;

        let source = PypiSource::new("empty", &server.url());
        let fetcher = HttpFetcher::with_default_timeout().unwrap();
        let result = source.resolve(&fetcher).await;

        mock.assert_async().await;
        assert!(matches!(result, Err(ResolveError::NotFound(_))));
    }

    #[tokio::test]
    async fn resolve_returns_remote_error_for_server_failure() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/pypi/requests/json")
            .with_status(500)
            .create_async()
            .await;

        let source = PypiSource::new("requests", &server.url());
        let fetcher = HttpFetcher::with_default_timeout().unwrap();
        let result = source.resolve(&fetcher).await;

        mock.assert_async().await;
        assert!(matches!(result, Err(ResolveError::Remote(_))));
    }

    #[tokio::test]
    async fn resolve_returns_remote_error_for_invalid_payload() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/pypi/requests/json")
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let source = PypiSource::new("requests", &server.url());
        let fetcher = HttpFetcher::with_default_timeout().unwrap();
        let result = source.resolve(&fetcher).await;

        mock.assert_async().await;
        assert!(matches!(result, Err(ResolveError::Remote(_))));
    }
}
