//! Declarative source and package descriptors
//!
//! Descriptors are plain data read from the collection file. The kind is kept
//! as a string so that an unknown kind only fails its own item, not the whole
//! file.

use serde::Deserialize;

/// Kind of upstream source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Regex scrape of a download page (or its headers)
    Generic,
    /// Python Package Index
    Pypi,
    /// GitHub tag list
    GitHub,
    /// Bitbucket tag list
    Bitbucket,
    /// Yum/dnf repository metadata
    Yum,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Generic => "generic",
            SourceKind::Pypi => "pypi",
            SourceKind::GitHub => "github",
            SourceKind::Bitbucket => "bitbucket",
            SourceKind::Yum => "yum",
        }
    }
}

impl std::str::FromStr for SourceKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "generic" => Ok(SourceKind::Generic),
            "pypi" => Ok(SourceKind::Pypi),
            "github" => Ok(SourceKind::GitHub),
            "bitbucket" => Ok(SourceKind::Bitbucket),
            "yum" => Ok(SourceKind::Yum),
            _ => Err(()),
        }
    }
}

/// Kind of downstream package repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageKind {
    /// Arch User Repository
    Aur,
    /// Official Arch Linux repositories
    Arch,
    /// Yum/dnf repository metadata
    Yum,
}

impl PackageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageKind::Aur => "aur",
            PackageKind::Arch => "arch",
            PackageKind::Yum => "yum",
        }
    }
}

impl std::str::FromStr for PackageKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "aur" => Ok(PackageKind::Aur),
            "arch" => Ok(PackageKind::Arch),
            "yum" => Ok(PackageKind::Yum),
            _ => Err(()),
        }
    }
}

/// Where to look for the upstream version.
///
/// Accepts either a table or a shorthand string: a kind name (`"pypi"`) or a
/// URL, which becomes a `generic` source.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "SourceEntry")]
pub struct SourceDescriptor {
    pub kind: String,
    pub name: Option<String>,
    pub url: Option<String>,
    pub owner: Option<String>,
    pub pattern: Option<String>,
    pub use_headers: bool,
    pub tag_trims: Vec<String>,
}

impl SourceDescriptor {
    pub fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            ..Self::default()
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SourceEntry {
    Short(String),
    Full(SourceTable),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SourceTable {
    // Empty when absent; `build_source` reports it
    #[serde(default)]
    kind: String,
    name: Option<String>,
    url: Option<String>,
    owner: Option<String>,
    pattern: Option<String>,
    #[serde(default)]
    use_headers: bool,
    #[serde(default)]
    tag_trims: Vec<String>,
}

impl From<SourceEntry> for SourceDescriptor {
    fn from(entry: SourceEntry) -> Self {
        match entry {
            SourceEntry::Short(text) if text.starts_with("http") => Self {
                url: Some(text),
                ..Self::new(SourceKind::Generic.as_str())
            },
            SourceEntry::Short(kind) => Self::new(&kind),
            SourceEntry::Full(table) => Self {
                kind: table.kind,
                name: table.name,
                url: table.url,
                owner: table.owner,
                pattern: table.pattern,
                use_headers: table.use_headers,
                tag_trims: table.tag_trims,
            },
        }
    }
}

/// Where to look for the packaged version.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageDescriptor {
    #[serde(default)]
    pub kind: String,
    pub name: Option<String>,
    /// Repository channel (e.g. `extra`)
    pub repo: Option<String>,
    /// Preferred architecture
    pub arch: Option<String>,
    pub url: Option<String>,
}

impl PackageDescriptor {
    pub fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Deserialize)]
    struct Wrapper {
        source: SourceDescriptor,
    }

    #[rstest]
    #[case("generic", Some(SourceKind::Generic))]
    #[case("pypi", Some(SourceKind::Pypi))]
    #[case("github", Some(SourceKind::GitHub))]
    #[case("bitbucket", Some(SourceKind::Bitbucket))]
    #[case("yum", Some(SourceKind::Yum))]
    #[case("sourceforge", None)]
    fn source_kind_from_str_returns_expected(
        #[case] input: &str,
        #[case] expected: Option<SourceKind>,
    ) {
        assert_eq!(input.parse::<SourceKind>().ok(), expected);
        if let Some(kind) = expected {
            assert_eq!(kind.as_str(), input);
        }
    }

    #[rstest]
    #[case("aur", Some(PackageKind::Aur))]
    #[case("arch", Some(PackageKind::Arch))]
    #[case("yum", Some(PackageKind::Yum))]
    #[case("deb", None)]
    fn package_kind_from_str_returns_expected(
        #[case] input: &str,
        #[case] expected: Option<PackageKind>,
    ) {
        assert_eq!(input.parse::<PackageKind>().ok(), expected);
    }

    #[test]
    fn source_shorthand_kind_name() {
        let parsed: Wrapper = toml::from_str(r#"source = "pypi""#).unwrap();
        assert_eq!(parsed.source, SourceDescriptor::new("pypi"));
    }

    #[test]
    fn source_shorthand_url_becomes_generic() {
        let parsed: Wrapper =
            toml::from_str(r#"source = "https://example.com/downloads/""#).unwrap();
        assert_eq!(parsed.source.kind, "generic");
        assert_eq!(
            parsed.source.url.as_deref(),
            Some("https://example.com/downloads/")
        );
    }

    #[test]
    fn source_table_parses_all_fields() {
        let parsed: Wrapper = toml::from_str(
            r#"
            [source]
            kind = "github"
            name = "ripgrep"
            owner = "BurntSushi"
            tag_trims = ["v"]
            "#,
        )
        .unwrap();

        assert_eq!(
            parsed.source,
            SourceDescriptor {
                kind: "github".to_string(),
                name: Some("ripgrep".to_string()),
                owner: Some("BurntSushi".to_string()),
                tag_trims: vec!["v".to_string()],
                ..SourceDescriptor::default()
            }
        );
    }

    #[test]
    fn tables_without_kind_still_parse() {
        let parsed: Wrapper = toml::from_str(r#"source = { owner = "BurntSushi" }"#).unwrap();
        assert_eq!(parsed.source.kind, "");
        assert_eq!(parsed.source.owner.as_deref(), Some("BurntSushi"));

        let package: PackageDescriptor = toml::from_str(r#"repo = "extra""#).unwrap();
        assert_eq!(package.kind, "");
        assert_eq!(package.repo.as_deref(), Some("extra"));
    }
}
