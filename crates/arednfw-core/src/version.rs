//! Version specifiers and the published version catalog
//!
//! The catalog is scraped from the downloads site's `config.js`, which
//! embeds a single-quoted `versions: {...}` object literal inside a
//! script blob. The extraction is confined to
//! [`VersionCatalog::from_config_script`] so it can be swapped for a
//! structured endpoint without touching selection logic.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::ResolveError;

/// A requested firmware version: a symbolic alias resolved against the
/// live catalog, or an explicit version string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSpec {
    Release,
    Nightly,
    NightlyBabel,
    Explicit(String),
}

impl VersionSpec {
    /// Parse a raw specifier.
    ///
    /// Anything that is neither an alias nor a `d.d.d.d` version string
    /// is rejected here, before any network access happens.
    pub fn parse(raw: &str) -> Result<Self, ResolveError> {
        match raw {
            "release" => Ok(Self::Release),
            "nightly" => Ok(Self::Nightly),
            "nightly-babel" => Ok(Self::NightlyBabel),
            _ if explicit_version_re().is_match(raw) => Ok(Self::Explicit(raw.to_string())),
            _ => Err(ResolveError::UnknownVersionFormat(raw.to_string())),
        }
    }

    /// The literal specifier text, as used in cache keys.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Release => "release",
            Self::Nightly => "nightly",
            Self::NightlyBabel => "nightly-babel",
            Self::Explicit(v) => v,
        }
    }

    /// Aliases are never trusted from the cache; they re-resolve against
    /// the catalog on every lookup.
    pub fn is_alias(&self) -> bool {
        !matches!(self, Self::Explicit(_))
    }
}

fn explicit_version_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]\.[0-9]\.[0-9]\.[0-9]$").expect("valid regex"))
}

fn versions_fragment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"versions: (\{.+\}),").expect("valid regex"))
}

/// The published catalog of firmware versions, keyed by version id.
///
/// Keys iterate in lexicographic (code point) order, NOT semantic-version
/// order. Alias selection is defined over that ordering: it assumes
/// date-stamped nightly ids sort before the numbered releases and babel
/// ids after them. Known limitation, kept as-is because the selection
/// offsets are tuned to it.
#[derive(Debug, Clone, Default)]
pub struct VersionCatalog {
    /// version id -> data path fragment on the downloads site
    versions: BTreeMap<String, String>,
}

impl VersionCatalog {
    /// Extract the `versions: {...}` object literal from `config.js` and
    /// parse it.
    ///
    /// The fragment uses single-quoted keys and values; quoting is
    /// normalized before structured parsing. Anything that yields no
    /// entries is an empty catalog.
    pub fn from_config_script(script: &str) -> Result<Self, ResolveError> {
        let fragment = versions_fragment_re()
            .captures(script)
            .and_then(|caps| caps.get(1))
            .ok_or(ResolveError::EmptyCatalog)?;

        let versions: BTreeMap<String, String> =
            serde_json::from_str(&fragment.as_str().replace('\'', "\""))
                .map_err(|_| ResolveError::EmptyCatalog)?;

        if versions.is_empty() {
            return Err(ResolveError::EmptyCatalog);
        }
        Ok(Self { versions })
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Resolve a specifier to a concrete version id.
    ///
    /// `nightly` is the first sorted entry, `nightly-babel` the last,
    /// `release` the second-to-last. An explicit version must be
    /// literally present in the catalog.
    pub fn select(&self, spec: &VersionSpec) -> Result<&str, ResolveError> {
        if let VersionSpec::Explicit(version) = spec {
            return self
                .versions
                .get_key_value(version)
                .map(|(id, _)| id.as_str())
                .ok_or_else(|| ResolveError::VersionNotFound(version.clone()));
        }

        let selected = match spec {
            VersionSpec::Nightly => self.versions.keys().next(),
            VersionSpec::NightlyBabel => self.versions.keys().next_back(),
            VersionSpec::Release => self.versions.keys().rev().nth(1),
            VersionSpec::Explicit(_) => unreachable!(),
        };
        selected
            .map(String::as_str)
            .ok_or(ResolveError::EmptyCatalog)
    }
}
