//! Status of a packaged version relative to upstream

use serde::Serialize;

use crate::version::evr::{Version, compare};

/// Status of the packaged version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionStatus {
    /// Packaged version matches upstream
    Latest,
    /// Upstream has released something newer
    Outdated,
    /// Packaged version is ahead of upstream (snapshot or pre-release packaging)
    Newer,
}

impl VersionStatus {
    /// Short label used in the report table
    pub fn label(&self) -> &'static str {
        match self {
            VersionStatus::Latest => "OK",
            VersionStatus::Outdated => "UPDATE",
            VersionStatus::Newer => "NEWER",
        }
    }
}

/// Compare a packaged version against the latest upstream version.
///
/// Uses EVR semantics: a pure upstream version is compared against the
/// packaged upstream component only, so `1.0` vs `1:1.0-3` is `Latest`.
pub fn check(upstream: &Version, packaged: &Version) -> VersionStatus {
    match compare(upstream, packaged) {
        std::cmp::Ordering::Greater => VersionStatus::Outdated,
        std::cmp::Ordering::Less => VersionStatus::Newer,
        std::cmp::Ordering::Equal => VersionStatus::Latest,
    }
}
