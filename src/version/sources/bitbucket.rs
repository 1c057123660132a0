//! Bitbucket tags API source

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::version::descriptor::SourceKind;
use crate::version::error::ResolveError;
use crate::version::evr::Version;
use crate::version::fetch::Fetcher;
use crate::version::source::{SourceResolver, parse_candidates};
use crate::version::sources::trim_tag;

const TAGS_PER_PAGE: u32 = 100;

/// Tag pages read before giving up on older tags
const MAX_TAG_PAGES: usize = 10;

#[derive(Debug, Deserialize)]
struct TagPage {
    values: Vec<TagRef>,
    /// Absolute URL of the following page, absent on the last one
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TagRef {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Source reading a repository's tag list on Bitbucket
pub struct BitbucketSource {
    name: String,
    owner: String,
    tag_trims: Vec<String>,
    base_url: String,
}

impl BitbucketSource {
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
impl SourceResolver for BitbucketSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Bitbucket
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn resolve(&self, fetcher: &dyn Fetcher) -> Result<Vec<Version>, ResolveError> {
        let mut tags: Vec<TagRef> = Vec::new();
        let mut next = Some(format!(
            "{}/2.0/repositories/{}/{}/refs/tags?pagelen={}",
            self.base_url, self.owner, self.name, TAGS_PER_PAGE
        ));

        for _ in 0..MAX_TAG_PAGES {
            let Some(url) = next.take() else {
                break;
            };
            debug!("Fetching Bitbucket tags: {}", url);

            let response = fetcher.fetch(&url, false).await?;

            if !response.is_success() {
                warn!("Bitbucket API returned status {}: {}", response.status, url);
                let message = response
                    .json::<ErrorBody>()
                    .map(|body| body.error.message)
                    .unwrap_or_else(|_| format!("status {}", response.status));
                return Err(ResolveError::Remote(format!(
                    "Bitbucket {}/{}: {}",
                    self.owner, self.name, message
                )));
            }

            let page: TagPage = response.json()?;
            tags.extend(page.values);
            next = page.next;
        }

        parse_candidates(
            &format!("{}/{} on Bitbucket", self.owner, self.name),
            tags.iter().map(|tag| trim_tag(&tag.name, &self.tag_trims)),
        )
    }
}
