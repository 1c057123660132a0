//! Yum repository metadata as the downstream package

use async_trait::async_trait;

use crate::version::descriptor::PackageKind;
use crate::version::error::ResolveError;
use crate::version::evr::Version;
use crate::version::fetch::Fetcher;
use crate::version::package::PackageResolver;
use crate::version::repodata::RepoMetadata;

/// Package shipped in a yum/dnf repository
pub struct YumPackage {
    name: String,
    repo: RepoMetadata,
}

impl YumPackage {
    pub fn new(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            repo: RepoMetadata::new(url),
        }
    }
}

#[async_trait]
impl PackageResolver for YumPackage {
    fn kind(&self) -> PackageKind {
        PackageKind::Yum
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn resolve(&self, fetcher: &dyn Fetcher) -> Result<Version, ResolveError> {
        self.repo.package_version(fetcher, &self.name).await
    }
}
