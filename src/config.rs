use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;

use crate::pipeline::item::Item;
use crate::version::descriptor::{PackageDescriptor, SourceDescriptor};

// =============================================================================
// Network-related constants
// =============================================================================

/// Timeout for a single fetch in milliseconds (30 seconds)
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 30_000;

/// User agent sent with every request (GitHub rejects requests without one)
pub const USER_AGENT: &str = concat!("toleo/", env!("CARGO_PKG_VERSION"));

pub const DEFAULT_PYPI_URL: &str = "https://pypi.org";
pub const DEFAULT_GITHUB_URL: &str = "https://api.github.com";
pub const DEFAULT_BITBUCKET_URL: &str = "https://api.bitbucket.org";
pub const DEFAULT_AUR_URL: &str = "https://aur.archlinux.org";
pub const DEFAULT_ARCH_URL: &str = "https://archlinux.org";

/// Name of the collection read when none is given
pub const DEFAULT_COLLECTION: &str = "default";

/// Base URLs of the hosted APIs
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Endpoints {
    pub pypi: String,
    pub github: String,
    pub bitbucket: String,
    pub aur: String,
    pub arch: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            pypi: DEFAULT_PYPI_URL.to_string(),
            github: DEFAULT_GITHUB_URL.to_string(),
            bitbucket: DEFAULT_BITBUCKET_URL.to_string(),
            aur: DEFAULT_AUR_URL.to_string(),
            arch: DEFAULT_ARCH_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Point every endpoint at the same base URL (used against local test servers).
    pub fn all(base_url: &str) -> Self {
        Self {
            pypi: base_url.to_string(),
            github: base_url.to_string(),
            bitbucket: base_url.to_string(),
            aur: base_url.to_string(),
            arch: base_url.to_string(),
        }
    }
}

/// One entry of a collection file
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ItemConfig {
    pub source: SourceDescriptor,
    pub package: Option<PackageDescriptor>,
}

/// A collection file: the ordered list of items to check
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Collection {
    pub endpoints: Endpoints,
    /// Package descriptor used by items that declare none
    pub default_package: Option<PackageDescriptor>,
    pub packages: IndexMap<String, ItemConfig>,
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid collection {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl Collection {
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text).map_err(|source| ConfigLoadError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Items in declaration order, keeping only names containing `limit`.
    pub fn items(&self, limit: Option<&str>) -> Vec<Item> {
        self.packages
            .iter()
            .filter(|(name, _)| limit.is_none_or(|needle| name.contains(needle)))
            .map(|(name, entry)| Item {
                name: name.clone(),
                source: entry.source.clone(),
                package: entry
                    .package
                    .clone()
                    .or_else(|| self.default_package.clone()),
            })
            .collect()
    }
}

/// Returns the directory holding collection files.
/// Uses $XDG_CONFIG_HOME/toleo if XDG_CONFIG_HOME is set,
/// otherwise falls back to ~/.config/toleo,
/// or ./toleo if neither is available.
pub fn config_dir() -> PathBuf {
    config_dir_with_env(std::env::var("XDG_CONFIG_HOME").ok(), dirs::home_dir())
}

/// Returns the path of the named collection file inside `dir`.
pub fn collection_path(dir: &Path, collection: &str) -> PathBuf {
    dir.join(collection).with_extension("toml")
}

fn config_dir_with_env(xdg_config_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let config_dir = xdg_config_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."));

    config_dir.join("toleo")
}
