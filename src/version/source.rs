//! Source resolver trait for discovering upstream versions

use async_trait::async_trait;
use indexmap::IndexSet;
use tracing::debug;

use crate::version::descriptor::SourceKind;
use crate::version::error::ResolveError;
use crate::version::evr::{Version, latest};
use crate::version::fetch::Fetcher;

/// Trait for discovering the versions an upstream project has published
///
/// A resolver is built from a validated descriptor and holds no mutable
/// state, so concurrent calls never interfere.
#[async_trait]
pub trait SourceResolver: Send + Sync {
    /// Returns the kind of source this implementation handles
    fn kind(&self) -> SourceKind;

    /// Returns the upstream project name
    fn name(&self) -> &str;

    /// Fetches every candidate version the source lists
    ///
    /// # Returns
    /// * `Ok(Vec<Version>)` - Candidates in the order the source listed them, never empty
    /// * `Err(ResolveError)` - `NotFound` when nothing was found, `Remote`, `Transport`
    ///   or `MalformedVersion` otherwise
    async fn resolve(&self, fetcher: &dyn Fetcher) -> Result<Vec<Version>, ResolveError>;
}

/// Resolve a source and reduce its candidates to the latest one.
pub async fn resolve_latest(
    resolver: &dyn SourceResolver,
    fetcher: &dyn Fetcher,
) -> Result<Version, ResolveError> {
    let candidates = resolver.resolve(fetcher).await?;
    debug!(
        "Found {} candidate versions for {} source {}",
        candidates.len(),
        resolver.kind().as_str(),
        resolver.name()
    );
    latest(candidates)
}

/// Parse raw candidate strings, dropping duplicates but keeping first-seen order.
///
/// An empty input is reported as [`ResolveError::NotFound`] for `what`.
pub(crate) fn parse_candidates<I, S>(what: &str, raw: I) -> Result<Vec<Version>, ResolveError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let unique: IndexSet<String> = raw.into_iter().map(|s| s.as_ref().to_string()).collect();
    if unique.is_empty() {
        return Err(ResolveError::NotFound(format!("no versions found for {}", what)));
    }

    unique.iter().map(|s| Version::parse(s)).collect()
}
