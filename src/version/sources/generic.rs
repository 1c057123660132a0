//! Download page scraper

use async_trait::async_trait;
use regex::Regex;
use tracing::{debug, warn};

use crate::version::descriptor::SourceKind;
use crate::version::error::ResolveError;
use crate::version::evr::Version;
use crate::version::fetch::Fetcher;
use crate::version::source::{SourceResolver, parse_candidates};

/// Scrapes versions out of an arbitrary page with a regular expression.
///
/// The first capture group of each match is the version; patterns without
/// groups use the whole match. With `use_headers` the pattern runs over the
/// response headers instead of the body.
pub struct GenericSource {
    name: String,
    url: String,
    pattern: Regex,
    use_headers: bool,
}

impl GenericSource {
    pub fn new(
        name: &str,
        url: &str,
        pattern: Option<&str>,
        use_headers: bool,
    ) -> Result<Self, ResolveError> {
        let pattern = match pattern {
            Some(pattern) => Regex::new(pattern),
            None => Regex::new(&Self::default_pattern(name)),
        }
        .map_err(|e| ResolveError::Config(format!("invalid pattern for {}: {}", name, e)))?;

        Ok(Self {
            name: name.to_string(),
            url: url.to_string(),
            pattern,
            use_headers,
        })
    }

    /// `name-1.2.3.tar.gz`, `name_1.2.3.tgz`, ...
    fn default_pattern(name: &str) -> String {
        format!(r"{}[-_]([\d.]+)\.(?:tar\.gz|tgz)", regex::escape(name))
    }

    fn extract<'a>(&self, text: &'a str) -> Vec<&'a str> {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| caps.get(1).or_else(|| caps.get(0)))
            .map(|m| m.as_str())
            .collect()
    }
}

#[async_trait]
impl SourceResolver for GenericSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Generic
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn resolve(&self, fetcher: &dyn Fetcher) -> Result<Vec<Version>, ResolveError> {
        let response = fetcher.fetch(&self.url, self.use_headers).await?;

        // Redirect headers carry the download name in header mode
        let accepted = response.is_success() || (self.use_headers && response.is_redirect());
        if !accepted {
            warn!("{} returned status {}", self.url, response.status);
            return Err(ResolveError::Remote(format!(
                "{} returned status {}",
                self.url, response.status
            )));
        }

        let text = response.text();
        let matches = self.extract(&text);
        debug!("Pattern matched {} times on {}", matches.len(), self.url);

        parse_candidates(&format!("{} at {}", self.name, self.url), matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::fetch::{FetchResponse, HttpFetcher, MockFetcher};
    use crate::version::evr::latest;
    use mockito::Server;

    const LISTING: &str = r#"
        <a href="mint-x-icons_1.4.3.tar.gz">mint-x-icons_1.4.3.tar.gz</a>
        <a href="mint-x-icons_1.4.10.tar.gz">mint-x-icons_1.4.10.tar.gz</a>
        <a href="mint-x-icons_1.4.9.tgz">mint-x-icons_1.4.9.tgz</a>
        <a href="mint-y-icons_9.9.tar.gz">mint-y-icons_9.9.tar.gz</a>
    "#;

    #[tokio::test]
    async fn resolve_extracts_versions_with_default_pattern() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/pool/main/m/mint-x-icons/")
            .with_status(200)
            .with_body(LISTING)
            .create_async()
            .await;

        let source = GenericSource::new(
            "mint-x-icons",
            &format!("{}/pool/main/m/mint-x-icons/", server.url()),
            None,
            false,
        )
        .unwrap();
        let fetcher = HttpFetcher::with_default_timeout().unwrap();
        let versions = source.resolve(&fetcher).await.unwrap();

        mock.assert_async().await;
        let raw: Vec<_> = versions.iter().map(|v| v.as_str()).collect();
        assert_eq!(raw, vec!["1.4.3", "1.4.10", "1.4.9"]);
        assert_eq!(latest(versions).unwrap().as_str(), "1.4.10");
    }

    #[tokio::test]
    async fn resolve_uses_custom_pattern() {
        let mut fetcher = MockFetcher::new();
        fetcher
            .expect_fetch()
            .withf(|url, use_headers| url == "https://example.com/news" && !use_headers)
            .times(1)
            .returning(|_, _| Ok(FetchResponse::new(200, "Release 2.1 out now! Release 2.0 was")));

        let source = GenericSource::new(
            "example",
            "https://example.com/news",
            Some(r"Release (\d+\.\d+)"),
            false,
        )
        .unwrap();
        let versions = source.resolve(&fetcher).await.unwrap();

        let raw: Vec<_> = versions.iter().map(|v| v.as_str()).collect();
        assert_eq!(raw, vec!["2.1", "2.0"]);
    }

    #[tokio::test]
    async fn resolve_scans_headers_when_requested() {
        let mut fetcher = MockFetcher::new();
        fetcher
            .expect_fetch()
            .withf(|_, use_headers| *use_headers)
            .times(1)
            .returning(|_, _| {
                Ok(FetchResponse::new(
                    200,
                    r#"{"content-disposition":"attachment; filename=tool-3.2.1.tar.gz"}"#,
                ))
            });

        let source =
            GenericSource::new("tool", "https://example.com/latest", None, true).unwrap();
        let versions = source.resolve(&fetcher).await.unwrap();

        assert_eq!(versions.len(), 1);
        assert_eq!(versions[0].as_str(), "3.2.1");
    }

    #[tokio::test]
    async fn resolve_reads_redirect_location_in_header_mode() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("HEAD", "/latest")
            .with_status(302)
            .with_header("location", "/files/tool-2.0.tar.gz")
            .create_async()
            .await;

        let source =
            GenericSource::new("tool", &format!("{}/latest", server.url()), None, true).unwrap();
        let fetcher = HttpFetcher::with_default_timeout().unwrap();
        let versions = source.resolve(&fetcher).await.unwrap();

        mock.assert_async().await;
        assert_eq!(latest(versions).unwrap().as_str(), "2.0");
    }

    #[tokio::test]
    async fn resolve_rejects_redirect_when_scanning_body() {
        let mut fetcher = MockFetcher::new();
        fetcher
            .expect_fetch()
            .returning(|_, _| Ok(FetchResponse::new(302, "tool-2.0.tar.gz")));

        let source = GenericSource::new("tool", "https://example.com/", None, false).unwrap();
        let result = source.resolve(&fetcher).await;

        assert!(matches!(result, Err(ResolveError::Remote(_))));
    }

    #[tokio::test]
    async fn resolve_returns_not_found_without_matches() {
        let mut fetcher = MockFetcher::new();
        fetcher
            .expect_fetch()
            .returning(|_, _| Ok(FetchResponse::new(200, "nothing to see")));

        let source = GenericSource::new("tool", "https://example.com/", None, false).unwrap();
        let result = source.resolve(&fetcher).await;

        assert!(matches!(result, Err(ResolveError::NotFound(_))));
    }

    #[tokio::test]
    async fn resolve_returns_remote_error_for_failed_status() {
        let mut fetcher = MockFetcher::new();
        fetcher
            .expect_fetch()
            .returning(|_, _| Ok(FetchResponse::new(503, "")));

        let source = GenericSource::new("tool", "https://example.com/", None, false).unwrap();
        let result = source.resolve(&fetcher).await;

        assert!(matches!(result, Err(ResolveError::Remote(_))));
    }

    #[test]
    fn new_rejects_invalid_pattern() {
        let result = GenericSource::new("tool", "https://example.com/", Some("(unclosed"), false);

        assert!(matches!(result, Err(ResolveError::Config(_))));
    }

    #[test]
    fn default_pattern_escapes_name() {
        let source = GenericSource::new("gtk+", "https://example.com/", None, false).unwrap();

        assert_eq!(source.extract("gtk+-3.24.tar.gz gtkk-1.0.tar.gz"), vec!["3.24"]);
    }
}
