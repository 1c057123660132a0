use thiserror::Error;

/// Failures raised while resolving one item.
///
/// Every variant is local to the item that produced it; the pipeline never
/// lets one item's error affect another.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Malformed version {version:?}: {reason}")]
    MalformedVersion {
        version: String,
        reason: &'static str,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Remote error: {0}")]
    Remote(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("No candidate versions to choose from")]
    EmptyVersionSet,

    #[error("Resolution cancelled before completion")]
    Cancelled,

    #[error("Resolution task failed: {0}")]
    Task(String),
}

impl ResolveError {
    pub(crate) fn malformed(version: &str, reason: &'static str) -> Self {
        Self::MalformedVersion {
            version: version.to_string(),
            reason,
        }
    }

    /// A descriptor of `kind` lacks `field`.
    pub(crate) fn missing_field(kind: &str, field: &str) -> Self {
        Self::Config(format!("{kind} requires field `{field}`"))
    }
}

impl From<reqwest::Error> for ResolveError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
