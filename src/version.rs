//! Module version classification.
//!
//! Go module versions are semver with a mandatory `v` prefix. `v1` and
//! `v1.2` are accepted as shorthands for `v1.0.0` and `v1.2.0`. Two build
//! metadata conventions matter to the rules:
//!
//! - `+incompatible` marks a v2+ release published without a `/vN` path
//!   suffix. It is ignored for ordering but kept by [`ModVersion::canonical`].
//! - Pseudo-versions (`v0.0.0-20191109021931-daa7c04131f5` and friends)
//!   are syntactically prereleases, but are classified separately.
//!
//! # Example
//!
//! ```rust
//! use modvet::version::{MajorTier, ModVersion};
//!
//! let v = ModVersion::parse("v3.1.0+incompatible").unwrap();
//! assert_eq!(v.tier(), MajorTier::V2PlusIncompatible);
//! assert_eq!(v.canonical(), "v3.1.0+incompatible");
//! ```

use crate::error::{ModvetError, Result};
use regex::Regex;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

static PSEUDO_VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^v[0-9]+\.(0\.0-|\d+\.\d+-([^+]*\.)?0\.)\d{14}-[A-Za-z0-9]+(\+incompatible)?$")
        .expect("Invalid regex")
});

const INCOMPATIBLE: &str = "incompatible";

/// Major-version tier of a version.
///
/// Every valid version falls in exactly one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MajorTier {
    /// Precedes v1.0.0 (includes v1.0.0 prereleases)
    BeforeV1,
    /// Major 1, at or after v1.0.0
    V1,
    /// Major 2 or higher tagged `+incompatible`
    V2PlusIncompatible,
    /// Major 2 or higher without the tag
    V2Plus,
}

/// Full classification of a version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Classification {
    /// Major-version tier
    pub tier: MajorTier,
    /// Non-pseudo prerelease
    pub prerelease: bool,
    /// Pseudo-version
    pub pseudo: bool,
}

/// A validated module version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModVersion {
    raw: String,
    version: semver::Version,
}

impl ModVersion {
    /// Parse and validate a version string.
    ///
    /// # Errors
    ///
    /// Returns `MalformedVersion` if the string is missing its `v` prefix,
    /// uses a shorthand together with prerelease or build parts, or is not
    /// valid semver.
    pub fn parse(raw: &str) -> Result<Self> {
        let malformed = |message: String| {
            crate::err!(MalformedVersion {
                version: raw.to_string(),
                message,
                rule: None,
            })
        };

        let body = raw
            .strip_prefix('v')
            .ok_or_else(|| malformed("missing 'v' prefix".to_string()))?;

        let core_end = body.find(['-', '+']).unwrap_or(body.len());
        let expanded = match body[..core_end].matches('.').count() {
            0 | 1 if core_end != body.len() => {
                return Err(malformed(
                    "shorthand versions cannot carry prerelease or build metadata".to_string(),
                ));
            }
            0 => format!("{body}.0.0"),
            1 => format!("{body}.0"),
            _ => body.to_string(),
        };

        let version = semver::Version::parse(&expanded).map_err(|e| malformed(e.to_string()))?;
        Ok(Self {
            raw: raw.to_string(),
            version,
        })
    }

    /// Parse a version, naming where it came from on failure.
    ///
    /// # Errors
    ///
    /// As [`ModVersion::parse`], with `context` appended to the message.
    pub fn parse_in(raw: &str, context: impl fmt::Display) -> Result<Self> {
        Self::parse(raw).map_err(|e| match e {
            ModvetError::MalformedVersion { version, message, rule, src_path, src_line } => {
                ModvetError::MalformedVersion {
                    version,
                    message: format!("{message} ({context})"),
                    rule,
                    src_path,
                    src_line,
                }
            }
            other => other,
        })
    }

    /// The string as given.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Major component.
    #[must_use]
    pub fn major(&self) -> u64 {
        self.version.major
    }

    /// Whether the build metadata is exactly `incompatible`.
    #[must_use]
    pub fn is_incompatible(&self) -> bool {
        self.version.build.as_str() == INCOMPATIBLE
    }

    /// Matches the reserved pseudo-version pattern.
    #[must_use]
    pub fn is_pseudo(&self) -> bool {
        PSEUDO_VERSION_PATTERN.is_match(&self.raw)
    }

    /// Has a prerelease component and is not a pseudo-version.
    #[must_use]
    pub fn is_prerelease(&self) -> bool {
        !self.version.pre.is_empty() && !self.is_pseudo()
    }

    /// Strictly precedes v1.0.0.
    #[must_use]
    pub fn is_before_v1(&self) -> bool {
        let v1 = semver::Version::new(1, 0, 0);
        cmp_precedence(&self.version, &v1) == Ordering::Less
    }

    /// Major is exactly 1 and the version does not precede v1.0.0.
    #[must_use]
    pub fn is_v1(&self) -> bool {
        self.version.major == 1 && !self.is_before_v1()
    }

    /// Major 2 or higher tagged `+incompatible`.
    ///
    /// A prerelease such as `v2.0.0-alpha+incompatible` still counts as a
    /// v2 release here.
    #[must_use]
    pub fn is_v2_plus_incompatible(&self) -> bool {
        self.version.major >= 2 && self.is_incompatible()
    }

    /// Major-version tier.
    #[must_use]
    pub fn tier(&self) -> MajorTier {
        if self.is_before_v1() {
            MajorTier::BeforeV1
        } else if self.is_v1() {
            MajorTier::V1
        } else if self.is_v2_plus_incompatible() {
            MajorTier::V2PlusIncompatible
        } else {
            MajorTier::V2Plus
        }
    }

    /// Classify on every axis at once.
    #[must_use]
    pub fn classify(&self) -> Classification {
        Classification {
            tier: self.tier(),
            prerelease: self.is_prerelease(),
            pseudo: self.is_pseudo(),
        }
    }

    /// `vMAJOR.MINOR.PATCH[-PRE][+incompatible]`.
    ///
    /// Shorthands are expanded and build metadata other than
    /// `+incompatible` is dropped.
    #[must_use]
    pub fn canonical(&self) -> String {
        let v = &self.version;
        let mut out = format!("v{}.{}.{}", v.major, v.minor, v.patch);
        if !v.pre.is_empty() {
            out.push('-');
            out.push_str(v.pre.as_str());
        }
        if self.is_incompatible() {
            out.push('+');
            out.push_str(INCOMPATIBLE);
        }
        out
    }

    /// Semver precedence, ignoring build metadata.
    #[must_use]
    pub fn cmp_precedence(&self, other: &Self) -> Ordering {
        cmp_precedence(&self.version, &other.version)
    }
}

fn cmp_precedence(a: &semver::Version, b: &semver::Version) -> Ordering {
    a.major
        .cmp(&b.major)
        .then(a.minor.cmp(&b.minor))
        .then(a.patch.cmp(&b.patch))
        .then_with(|| a.pre.cmp(&b.pre))
}

impl fmt::Display for ModVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
