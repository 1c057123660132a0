//! Epoch:version-release model and its comparison rules
//!
//! A version string may be bare (`4.2`) or carry an epoch and/or a release
//! (`1:4.2-3`). Bare strings are "pure". Comparison is context sensitive:
//!
//! - if either side is pure, only the upstream segments are compared
//!   (`4.2 == 4.2-3`, `1:4.2 == 4.2`)
//! - otherwise epoch, upstream and release are compared in that order
//!   (`4.2-7 < 1:4.1-4`, `1:4.2-7 < 1:4.2-8`)

use std::cmp::Ordering;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::version::error::ResolveError;

/// One alphanumeric run of a version segment.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Component {
    /// Digits with leading zeros stripped (`"0"` stays `"0"`).
    Numeric(String),
    Alpha(String),
}

impl Component {
    fn cmp_component(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Component::Numeric(a), Component::Numeric(b)) => {
                a.len().cmp(&b.len()).then_with(|| a.cmp(b))
            }
            (Component::Alpha(a), Component::Alpha(b)) => a.cmp(b),
            (Component::Numeric(_), Component::Alpha(_)) => Ordering::Greater,
            (Component::Alpha(_), Component::Numeric(_)) => Ordering::Less,
        }
    }
}

/// Split a segment into maximal digit or letter runs. Other characters
/// only separate runs.
fn split_components(segment: &str) -> Vec<Component> {
    let mut components = Vec::new();
    let mut chars = segment.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        if !c.is_ascii_alphanumeric() {
            chars.next();
            continue;
        }

        let numeric = c.is_ascii_digit();
        let mut end = start;
        while let Some(&(idx, c)) = chars.peek() {
            let same_run = if numeric {
                c.is_ascii_digit()
            } else {
                c.is_ascii_alphabetic()
            };
            if !same_run {
                break;
            }
            end = idx + c.len_utf8();
            chars.next();
        }

        let run = &segment[start..end];
        components.push(if numeric {
            let trimmed = run.trim_start_matches('0');
            Component::Numeric(if trimmed.is_empty() { "0" } else { trimmed }.to_string())
        } else {
            Component::Alpha(run.to_string())
        });
    }

    components
}

fn cmp_components(a: &[Component], b: &[Component]) -> Ordering {
    for (left, right) in a.iter().zip(b) {
        match left.cmp_component(right) {
            Ordering::Equal => continue,
            ordering => return ordering,
        }
    }
    // Shorter but otherwise equal sorts lower
    a.len().cmp(&b.len())
}

/// A parsed version string.
///
/// Immutable once built. Use [`compare`] (or the comparison operators, which
/// delegate to it) to order two values; see the module docs for why the
/// relation is not a plain lexicographic order.
#[derive(Debug, Clone)]
pub struct Version {
    raw: String,
    epoch: u64,
    upstream: Vec<Component>,
    release: Vec<Component>,
    pure: bool,
}

impl Version {
    /// Parse `raw` into its epoch, upstream and release parts.
    ///
    /// Fails with [`ResolveError::MalformedVersion`] for more than one `:` or
    /// `-`, a non-numeric epoch, or segments without any alphanumeric run.
    pub fn parse(raw: &str) -> Result<Self, ResolveError> {
        let colons = raw.matches(':').count();
        let dashes = raw.matches('-').count();
        if colons > 1 {
            return Err(ResolveError::malformed(raw, "more than one ':' separator"));
        }
        if dashes > 1 {
            return Err(ResolveError::malformed(raw, "more than one '-' separator"));
        }

        let (epoch_text, rest) = match raw.split_once(':') {
            Some((epoch, rest)) => (Some(epoch), rest),
            None => (None, raw),
        };
        let (upstream_text, release_text) = match rest.split_once('-') {
            Some((upstream, release)) => (upstream, Some(release)),
            None => (rest, None),
        };

        let epoch = match epoch_text {
            None | Some("") => 0,
            // `u64::from_str` also takes a leading `+`
            Some(text) if !text.bytes().all(|b| b.is_ascii_digit()) => {
                return Err(ResolveError::malformed(raw, "epoch is not a number"));
            }
            Some(text) => text
                .parse::<u64>()
                .map_err(|_| ResolveError::malformed(raw, "epoch is not a number"))?,
        };

        let upstream = split_components(upstream_text);
        if upstream.is_empty() {
            return Err(ResolveError::malformed(raw, "empty upstream version"));
        }

        let release = match release_text {
            Some(text) => {
                let release = split_components(text);
                if release.is_empty() {
                    return Err(ResolveError::malformed(raw, "empty release"));
                }
                release
            }
            None => vec![Component::Numeric("0".to_string())],
        };

        Ok(Self {
            raw: raw.to_string(),
            epoch,
            upstream,
            release,
            pure: colons == 0 && dashes == 0,
        })
    }

    /// The original string, as discovered.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// True when the original string had neither an epoch nor a release.
    pub fn is_pure(&self) -> bool {
        self.pure
    }
}

/// Order two versions.
///
/// When either side is pure only the upstream segments take part, so the
/// result is not transitive across pure and non-pure values: `4.2 == 4.2-3`
/// and `4.2 == 4.2-5` while `4.2-3 < 4.2-5`.
pub fn compare(a: &Version, b: &Version) -> Ordering {
    if a.pure || b.pure {
        return cmp_components(&a.upstream, &b.upstream);
    }

    a.epoch
        .cmp(&b.epoch)
        .then_with(|| cmp_components(&a.upstream, &b.upstream))
        .then_with(|| cmp_components(&a.release, &b.release))
}

/// Reduce candidates to the greatest one under [`compare`].
///
/// Ties keep the first-seen candidate.
pub fn latest<I>(versions: I) -> Result<Version, ResolveError>
where
    I: IntoIterator<Item = Version>,
{
    versions
        .into_iter()
        .reduce(|current, candidate| {
            if compare(&candidate, &current) == Ordering::Greater {
                candidate
            } else {
                current
            }
        })
        .ok_or(ResolveError::EmptyVersionSet)
}

impl std::str::FromStr for Version {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

// Delegates to `compare`; see its docs before relying on transitivity.
impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        compare(self, other) == Ordering::Equal
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(compare(self, other))
    }
}
