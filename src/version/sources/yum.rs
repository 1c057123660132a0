//! Yum repository metadata as an upstream source

use async_trait::async_trait;

use crate::version::descriptor::SourceKind;
use crate::version::error::ResolveError;
use crate::version::evr::Version;
use crate::version::fetch::Fetcher;
use crate::version::repodata::RepoMetadata;
use crate::version::source::SourceResolver;

/// Source reading the packaged EVR from another distribution's repository
pub struct YumSource {
    name: String,
    repo: RepoMetadata,
}

impl YumSource {
    pub fn new(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            repo: RepoMetadata::new(url),
        }
    }
}

#[async_trait]
impl SourceResolver for YumSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Yum
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn resolve(&self, fetcher: &dyn Fetcher) -> Result<Vec<Version>, ResolveError> {
        let version = self.repo.package_version(fetcher, &self.name).await?;
        Ok(vec![version])
    }
}
