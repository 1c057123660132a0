//! Official Arch Linux repository search

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::version::descriptor::PackageKind;
use crate::version::error::ResolveError;
use crate::version::evr::Version;
use crate::version::fetch::Fetcher;
use crate::version::package::PackageResolver;

/// Architecture preferred when a package is built for several
pub const DEFAULT_ARCH: &str = "x86_64";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    pkgname: String,
    repo: String,
    arch: String,
    epoch: u64,
    pkgver: String,
    pkgrel: String,
}

/// Package in an official Arch Linux repository channel
pub struct ArchPackage {
    name: String,
    repo: String,
    arch: String,
    base_url: String,
}

impl ArchPackage {
    pub fn new(name: &str, repo: &str, arch: &str, base_url: &str) -> Self {
        Self {
            name: name.to_string(),
            repo: repo.to_string(),
            arch: arch.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn search_url(&self) -> Result<Url, ResolveError> {
        Url::parse_with_params(
            &format!("{}/packages/search/json/", self.base_url),
            &[("name", self.name.as_str())],
        )
        .map_err(|e| ResolveError::Config(format!("invalid Arch URL {}: {}", self.base_url, e)))
    }

    /// The preferred architecture's build, else the first one listed.
    fn select<'a>(&self, results: &'a [SearchResult]) -> Option<&'a SearchResult> {
        let candidates: Vec<&SearchResult> = results
            .iter()
            .filter(|r| r.pkgname == self.name && r.repo.eq_ignore_ascii_case(&self.repo))
            .collect();

        candidates
            .iter()
            .find(|r| r.arch == self.arch)
            .or_else(|| candidates.first())
            .copied()
    }
}

#[async_trait]
impl PackageResolver for ArchPackage {
    fn kind(&self) -> PackageKind {
        PackageKind::Arch
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn resolve(&self, fetcher: &dyn Fetcher) -> Result<Version, ResolveError> {
        let url = self.search_url()?;
        debug!("Searching Arch packages: {}", url);

        let response = fetcher.fetch(url.as_str(), false).await?;

        if !response.is_success() {
            warn!("Arch package search returned status {}: {}", response.status, url);
            return Err(ResolveError::Remote(format!(
                "Arch package search returned status {}",
                response.status
            )));
        }

        let search: SearchResponse = response.json()?;
        let result = self.select(&search.results).ok_or_else(|| {
            ResolveError::NotFound(format!("{} in Arch repo {}", self.name, self.repo))
        })?;

        Version::parse(&format!(
            "{}:{}-{}",
            result.epoch, result.pkgver, result.pkgrel
        ))
    }
}
