//! Source resolver implementations for discovering upstream versions

mod bitbucket;
mod generic;
mod github;
mod pypi;
mod yum;

pub use bitbucket::BitbucketSource;
pub use generic::GenericSource;
pub use github::GitHubSource;
pub use pypi::PypiSource;
pub use yum::YumSource;

use crate::config::Endpoints;
use crate::version::descriptor::{SourceDescriptor, SourceKind};
use crate::version::error::ResolveError;
use crate::version::source::SourceResolver;

/// Build the resolver for a source descriptor
///
/// Validates every field the kind requires, so configuration errors surface
/// before any request is made. The source name defaults to `item_name`.
pub fn build_source(
    item_name: &str,
    descriptor: &SourceDescriptor,
    endpoints: &Endpoints,
) -> Result<Box<dyn SourceResolver>, ResolveError> {
    if descriptor.kind.is_empty() {
        return Err(ResolveError::missing_field("source", "kind"));
    }
    let kind: SourceKind = descriptor.kind.parse().map_err(|_| {
        ResolveError::Config(format!("unknown source kind \"{}\"", descriptor.kind))
    })?;
    let name = descriptor.name.as_deref().unwrap_or(item_name);
    let required = |field: &'static str, value: &Option<String>| {
        value
            .clone()
            .ok_or_else(|| ResolveError::missing_field(&format!("{} source", kind.as_str()), field))
    };

    let resolver: Box<dyn SourceResolver> = match kind {
        SourceKind::Generic => Box::new(GenericSource::new(
            name,
            &required("url", &descriptor.url)?,
            descriptor.pattern.as_deref(),
            descriptor.use_headers,
        )?),
        SourceKind::Pypi => Box::new(PypiSource::new(name, &endpoints.pypi)),
        SourceKind::GitHub => Box::new(GitHubSource::new(
            name,
            &required("owner", &descriptor.owner)?,
            descriptor.tag_trims.clone(),
            &endpoints.github,
        )),
        SourceKind::Bitbucket => Box::new(BitbucketSource::new(
            name,
            &required("owner", &descriptor.owner)?,
            descriptor.tag_trims.clone(),
            &endpoints.bitbucket,
        )),
        SourceKind::Yum => Box::new(YumSource::new(name, &required("url", &descriptor.url)?)),
    };

    Ok(resolver)
}

/// Remove every trim substring from a tag, in order.
pub(crate) fn trim_tag(tag: &str, tag_trims: &[String]) -> String {
    tag_trims
        .iter()
        .fold(tag.to_string(), |tag, trim| tag.replace(trim.as_str(), ""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("v1.2.0", &["v"], "1.2.0")]
    #[case("ripgrep-14.1.0", &["ripgrep-"], "14.1.0")]
    #[case("release_v2", &["release_", "v"], "2")]
    #[case("1.0", &[], "1.0")]
    fn trim_tag_returns_expected(#[case] tag: &str, #[case] trims: &[&str], #[case] expected: &str) {
        let trims: Vec<String> = trims.iter().map(|s| s.to_string()).collect();
        assert_eq!(trim_tag(tag, &trims), expected);
    }

    #[rstest]
    #[case(SourceDescriptor::new("generic"), "url")]
    #[case(SourceDescriptor::new("github"), "owner")]
    #[case(SourceDescriptor::new("bitbucket"), "owner")]
    #[case(SourceDescriptor::new("yum"), "url")]
    #[case(SourceDescriptor { owner: Some("BurntSushi".to_string()), ..SourceDescriptor::default() }, "kind")]
    fn build_source_reports_missing_field(
        #[case] descriptor: SourceDescriptor,
        #[case] field: &str,
    ) {
        let result = build_source("foo", &descriptor, &Endpoints::default());

        match result {
            Err(ResolveError::Config(message)) => assert!(message.contains(field)),
            other => panic!("expected config error, got {:?}", other.map(|r| r.kind())),
        }
    }

    #[test]
    fn build_source_rejects_unknown_kind() {
        let result = build_source("foo", &SourceDescriptor::new("cvs"), &Endpoints::default());

        assert!(matches!(result, Err(ResolveError::Config(m)) if m.contains("cvs")));
    }

    #[test]
    fn build_source_defaults_name_to_item_name() {
        let resolver =
            build_source("requests", &SourceDescriptor::new("pypi"), &Endpoints::default())
                .unwrap();

        assert_eq!(resolver.kind(), SourceKind::Pypi);
        assert_eq!(resolver.name(), "requests");
    }

    #[test]
    fn build_source_prefers_explicit_name() {
        let descriptor = SourceDescriptor {
            name: Some("docker".to_string()),
            ..SourceDescriptor::new("pypi")
        };
        let resolver = build_source("python-docker", &descriptor, &Endpoints::default()).unwrap();

        assert_eq!(resolver.name(), "docker");
    }
}
