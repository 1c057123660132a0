//! Pipeline input and output types

use std::fmt;

use thiserror::Error;

use crate::version::checker::{VersionStatus, check};
use crate::version::descriptor::{PackageDescriptor, SourceDescriptor};
use crate::version::error::ResolveError;
use crate::version::evr::Version;

/// One named entry to resolve
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub name: String,
    pub source: SourceDescriptor,
    pub package: Option<PackageDescriptor>,
}

impl Item {
    pub fn new(name: &str, source: SourceDescriptor, package: PackageDescriptor) -> Self {
        Self {
            name: name.to_string(),
            source,
            package: Some(package),
        }
    }
}

/// Which half of an item failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Source,
    Package,
    /// The item never finished (cancelled or its task died)
    Pipeline,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Source => "source",
            Side::Package => "package",
            Side::Pipeline => "pipeline",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A [`ResolveError`] tagged with the side that raised it
#[derive(Debug, Error)]
#[error("{side}: {error}")]
pub struct ItemError {
    pub side: Side,
    #[source]
    pub error: ResolveError,
}

impl ItemError {
    pub fn new(side: Side, error: ResolveError) -> Self {
        Self { side, error }
    }
}

/// Terminal state of one item
#[derive(Debug)]
pub enum Outcome {
    Resolved { software: Version, package: Version },
    Failed(ItemError),
}

/// Result for one item, reported in input order
#[derive(Debug)]
pub struct ResolutionResult {
    pub name: String,
    pub outcome: Outcome,
}

impl ResolutionResult {
    pub fn is_resolved(&self) -> bool {
        matches!(self.outcome, Outcome::Resolved { .. })
    }

    /// Latest upstream version
    pub fn software(&self) -> Option<&Version> {
        match &self.outcome {
            Outcome::Resolved { software, .. } => Some(software),
            Outcome::Failed(_) => None,
        }
    }

    /// Currently packaged version
    pub fn package(&self) -> Option<&Version> {
        match &self.outcome {
            Outcome::Resolved { package, .. } => Some(package),
            Outcome::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ItemError> {
        match &self.outcome {
            Outcome::Resolved { .. } => None,
            Outcome::Failed(error) => Some(error),
        }
    }

    pub fn status(&self) -> Option<VersionStatus> {
        match &self.outcome {
            Outcome::Resolved { software, package } => Some(check(software, package)),
            Outcome::Failed(_) => None,
        }
    }
}
