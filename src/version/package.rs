//! Package resolver trait for looking up packaged versions

use async_trait::async_trait;

use crate::version::descriptor::PackageKind;
use crate::version::error::ResolveError;
use crate::version::evr::Version;
use crate::version::fetch::Fetcher;

/// Trait for looking up the version a downstream repository currently ships
#[async_trait]
pub trait PackageResolver: Send + Sync {
    /// Returns the kind of repository this implementation handles
    fn kind(&self) -> PackageKind;

    /// Returns the package name
    fn name(&self) -> &str;

    /// Fetches the packaged version
    ///
    /// # Returns
    /// * `Ok(Version)` - The single version currently packaged
    /// * `Err(ResolveError)` - `NotFound`, `Remote`, `Transport` or `MalformedVersion`
    async fn resolve(&self, fetcher: &dyn Fetcher) -> Result<Version, ResolveError>;
}
