//! Yum/dnf repository metadata reader
//!
//! Two fetches per lookup: `repodata/repomd.xml` names the primary package
//! listing, which is then downloaded (usually gzip-compressed) and searched
//! for the package's `<version epoch= ver= rel=/>` element.

use std::collections::HashMap;
use std::io::Read;
use std::sync::LazyLock;

use flate2::read::GzDecoder;
use regex::Regex;
use tracing::{debug, warn};

use crate::version::error::ResolveError;
use crate::version::evr::Version;
use crate::version::fetch::Fetcher;

static PRIMARY_LOCATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<data\s+type="primary"\s*>.*?<location\s+[^>]*?href="([^"]+)""#).unwrap()
});
static PACKAGE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<package\b[^>]*>(.*?)</package>").unwrap());
static PACKAGE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<name>\s*([^<]*?)\s*</name>").unwrap());
static VERSION_ELEMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<version\s+([^>]*?)/?>").unwrap());
static ATTRIBUTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(\w+)="([^"]*)""#).unwrap());

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Reader for one repository, identified by its base URL
#[derive(Debug, Clone)]
pub struct RepoMetadata {
    base_url: String,
}

impl RepoMetadata {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Look up `package` and return its full epoch:version-release.
    pub async fn package_version(
        &self,
        fetcher: &dyn Fetcher,
        package: &str,
    ) -> Result<Version, ResolveError> {
        let repomd_url = format!("{}/repodata/repomd.xml", self.base_url);
        let repomd = self.fetch_ok(fetcher, &repomd_url).await?;

        let href = primary_location(&String::from_utf8_lossy(&repomd)).ok_or_else(|| {
            ResolveError::Remote(format!("{} does not reference a primary listing", repomd_url))
        })?;

        let primary_url = format!("{}/{}", self.base_url, href.trim_start_matches('/'));
        let primary = decompress(&primary_url, self.fetch_ok(fetcher, &primary_url).await?)?;
        debug!("Searching {} bytes of {} for {}", primary.len(), primary_url, package);

        let (epoch, ver, rel) = find_package(&primary, package).ok_or_else(|| {
            ResolveError::NotFound(format!("{} in {}", package, self.base_url))
        })?;

        Version::parse(&format!("{}:{}-{}", epoch, ver, rel))
    }

    async fn fetch_ok(&self, fetcher: &dyn Fetcher, url: &str) -> Result<Vec<u8>, ResolveError> {
        let response = fetcher.fetch(url, false).await?;
        if !response.is_success() {
            warn!("Repository returned status {}: {}", response.status, url);
            return Err(ResolveError::Remote(format!(
                "{} returned status {}",
                url, response.status
            )));
        }
        Ok(response.body)
    }
}

fn primary_location(repomd: &str) -> Option<String> {
    PRIMARY_LOCATION
        .captures(repomd)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Inflate gzip payloads; plain XML passes through.
fn decompress(url: &str, body: Vec<u8>) -> Result<String, ResolveError> {
    if body.starts_with(&GZIP_MAGIC) {
        let mut xml = String::new();
        GzDecoder::new(body.as_slice())
            .read_to_string(&mut xml)
            .map_err(|e| ResolveError::Remote(format!("cannot decompress {}: {}", url, e)))?;
        return Ok(xml);
    }

    if url.ends_with(".xz") || url.ends_with(".zst") || url.ends_with(".bz2") {
        return Err(ResolveError::Remote(format!(
            "unsupported compression for {}",
            url
        )));
    }

    String::from_utf8(body)
        .map_err(|e| ResolveError::Remote(format!("{} is not valid UTF-8: {}", url, e)))
}

/// Epoch, version and release of the first `<package>` named `package`.
fn find_package(primary: &str, package: &str) -> Option<(String, String, String)> {
    PACKAGE_BLOCK
        .captures_iter(primary)
        .filter_map(|caps| caps.get(1))
        .map(|block| block.as_str())
        .find(|block| {
            PACKAGE_NAME
                .captures(block)
                .and_then(|caps| caps.get(1))
                .is_some_and(|name| name.as_str() == package)
        })
        .and_then(|block| {
            let element = VERSION_ELEMENT.captures(block)?.get(1)?.as_str();
            let attributes: HashMap<&str, &str> = ATTRIBUTE
                .captures_iter(element)
                .filter_map(|caps| Some((caps.get(1)?.as_str(), caps.get(2)?.as_str())))
                .collect();

            Some((
                attributes.get("epoch").copied().unwrap_or("0").to_string(),
                attributes.get("ver")?.to_string(),
                attributes.get("rel")?.to_string(),
            ))
        })
}
