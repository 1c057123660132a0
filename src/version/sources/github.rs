//! GitHub tags API source

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::version::descriptor::SourceKind;
use crate::version::error::ResolveError;
use crate::version::evr::Version;
use crate::version::fetch::Fetcher;
use crate::version::source::{SourceResolver, parse_candidates};
use crate::version::sources::trim_tag;

/// Number of tags requested per call (the API maximum)
const TAGS_PER_PAGE: usize = 100;

/// Tag pages read before giving up on older tags
const MAX_TAG_PAGES: usize = 10;

/// Entry of the GitHub tags API
#[derive(Debug, Deserialize)]
struct Tag {
    name: String,
}

/// Error body returned by the GitHub API
#[derive(Debug, Deserialize)]
struct ApiMessage {
    message: String,
}

/// Source reading a repository's tag list on GitHub
pub struct GitHubSource {
    name: String,
    owner: String,
    tag_trims: Vec<String>,
    base_url: String,
}

impl GitHubSource {
    pub fn new(name: &str, owner: &str, tag_trims: Vec<String>, base_url: &str) -> Self {
        Self {
            name: name.to_string(),
            owner: owner.to_string(),
            tag_trims,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl SourceResolver for GitHubSource {
    fn kind(&self) -> SourceKind {
        SourceKind::GitHub
    }

    fn name(&self) -> &str {
        &self.name
    }

    /// Reads tag pages until a short page, since the API orders tags by name.
    async fn resolve(&self, fetcher: &dyn Fetcher) -> Result<Vec<Version>, ResolveError> {
        let mut tags: Vec<Tag> = Vec::new();

        for page in 1..=MAX_TAG_PAGES {
            let url = format!(
                "{}/repos/{}/{}/tags?per_page={}&page={}",
                self.base_url, self.owner, self.name, TAGS_PER_PAGE, page
            );
            debug!("Fetching GitHub tags: {}", url);

            let response = fetcher.fetch(&url, false).await?;

            if !response.is_success() {
                warn!("GitHub API returned status {}: {}", response.status, url);
                let message = response
                    .json::<ApiMessage>()
                    .map(|body| body.message)
                    .unwrap_or_else(|_| format!("status {}", response.status));
                return Err(ResolveError::Remote(format!(
                    "GitHub {}/{}: {}",
                    self.owner, self.name, message
                )));
            }

            let batch: Vec<Tag> = response.json()?;
            let last_page = batch.len() < TAGS_PER_PAGE;
            tags.extend(batch);
            if last_page {
                break;
            }
        }

        parse_candidates(
            &format!("{}/{} on GitHub", self.owner, self.name),
            tags.iter().map(|tag| trim_tag(&tag.name, &self.tag_trims)),
        )
    }
}
