//! Arch User Repository RPC lookup

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::version::descriptor::PackageKind;
use crate::version::error::ResolveError;
use crate::version::evr::Version;
use crate::version::fetch::Fetcher;
use crate::version::package::PackageResolver;

/// AUR RPC response
#[derive(Debug, Deserialize)]
struct AurResponse {
    #[serde(rename = "resultcount", default)]
    result_count: usize,
    #[serde(default)]
    results: Vec<AurEntry>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AurEntry {
    #[serde(rename = "Version")]
    version: String,
}

/// Package in the AUR, looked up by exact name
pub struct AurPackage {
    name: String,
    base_url: String,
}

impl AurPackage {
    pub fn new(name: &str, base_url: &str) -> Self {
        Self {
            name: name.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn info_url(&self) -> Result<Url, ResolveError> {
        Url::parse_with_params(
            &format!("{}/rpc/", self.base_url),
            &[("v", "5"), ("type", "info"), ("arg[]", self.name.as_str())],
        )
        .map_err(|e| ResolveError::Config(format!("invalid AUR URL {}: {}", self.base_url, e)))
    }
}

#[async_trait]
impl PackageResolver for AurPackage {
    fn kind(&self) -> PackageKind {
        PackageKind::Aur
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn resolve(&self, fetcher: &dyn Fetcher) -> Result<Version, ResolveError> {
        let url = self.info_url()?;
        debug!("Fetching AUR package: {}", url);

        let response = fetcher.fetch(url.as_str(), false).await?;

        if !response.is_success() {
            warn!("AUR returned status {}: {}", response.status, url);
            return Err(ResolveError::Remote(format!(
                "AUR RPC returned status {}",
                response.status
            )));
        }

        let payload: AurResponse = response.json()?;

        if let Some(error) = payload.error {
            return Err(ResolveError::Remote(format!("AUR RPC error: {}", error)));
        }

        // The RPC guarantees at most one result per exact name
        match (payload.result_count, payload.results.as_slice()) {
            (1, [entry]) => Version::parse(&entry.version),
            (0, _) => Err(ResolveError::NotFound(format!("{} in AUR", self.name))),
            (count, _) => Err(ResolveError::NotFound(format!(
                "{} in AUR: lookup returned {} results",
                self.name, count
            ))),
        }
    }
}
