//! Tag normalization and version constraints.
//!
//! Forges hand back tags in whatever shape a project chose (`v1.2`,
//! `release-2021.03.1`, `curl-7_88_1`, `R_2_5_0`). [`normalize`] turns them
//! into comparable [`semver::Version`] values or gives up with `None`.
use log::*;
use regex::{Captures, Regex};
use semver::{BuildMetadata, Prerelease, Version, VersionReq};
use std::{fmt, sync::LazyLock};

use crate::error::{ReqcheckError, Result};

/// Default format used to build a constraint from a pinned version.
pub const DEFAULT_CONSTRAINT_FORMAT: &str = ">= %s";

/// Placeholder replaced by the pinned version in a constraint format.
pub const VERSION_PLACEHOLDER: &str = "%s";

/// Label used when a tag carries a bare `.` where a prerelease would be.
const BUILD_LABEL: &str = "build";

/// Semantic versions as most tooling accepts them: optional `v`, optional
/// minor and patch, optional prerelease and build metadata.
static STRICT_VERSION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^v?(?P<major>\d+)(?:\.(?P<minor>\d+))?(?:\.(?P<patch>\d+))?(?:-(?P<prerelease>[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*))?(?:\+(?P<build>[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*))?$",
    )
    .unwrap()
});

/// Anything with a leading non-numeric prefix and `.`, `_` or `-` separated
/// version parts, optionally followed by a prerelease label and number.
static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z_.\-]*(?P<major>\d+)[._\-](?P<minor>\d*)[._\-]*(?P<patch>\d*)[._\-]*(?P<prerelease>[a-zA-Z_.\-]*)(?P<preversion>\d*)$",
    )
    .unwrap()
});

/// Converts a raw tag into a semantic version.
///
/// A strict parse is tried first. When that fails the tag is matched against
/// a permissive pattern, reassembled as `major.minor.patch[-pre[.n]]` and
/// parsed again. Returns `None` when the tag cannot be made sense of.
///
/// ```
/// use reqcheck::version::normalize;
///
/// assert_eq!(normalize("v1.2").unwrap().to_string(), "1.2.0");
/// assert_eq!(
///     normalize("release-2021.03.1").unwrap().to_string(),
///     "2021.3.1"
/// );
/// assert!(normalize("nightly").is_none());
/// ```
pub fn normalize(tag: &str) -> Option<Version> {
    if let Some(version) = parse_strict(tag) {
        return Some(version);
    }

    let captures = TAG_REGEX.captures(tag)?;

    let major = &captures["major"];
    let minor = or_zero(&captures["minor"]);
    let patch = or_zero(&captures["patch"]);
    let prerelease = reassemble_prerelease(&captures);

    let reassembled = format!("{major}.{minor}.{patch}{prerelease}");

    let version = parse_strict(&reassembled);

    if version.is_none() {
        warn!(
            "could not parse version from tag {tag}: major={major} minor={minor} patch={patch} prerelease={} preversion={}",
            &captures["prerelease"], &captures["preversion"]
        );
    }

    version
}

fn or_zero(part: &str) -> &str {
    if part.is_empty() { "0" } else { part }
}

fn reassemble_prerelease(captures: &Captures) -> String {
    let label = &captures["prerelease"];

    if label.is_empty() {
        return String::new();
    }

    let label = if label == "." { BUILD_LABEL } else { label };

    let preversion = &captures["preversion"];

    if preversion.is_empty() {
        format!("-{label}")
    } else {
        format!("-{label}.{preversion}")
    }
}

/// Drop leading zeros from all-digit prerelease identifiers (`rc.01` becomes
/// `rc.1`); `semver` rejects them otherwise.
fn trim_numeric_identifiers(prerelease: &str) -> String {
    prerelease
        .split('.')
        .map(|ident| {
            if ident.len() > 1 && ident.bytes().all(|b| b.is_ascii_digit()) {
                let trimmed = ident.trim_start_matches('0');
                if trimmed.is_empty() { "0" } else { trimmed }
            } else {
                ident
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}

fn parse_strict(input: &str) -> Option<Version> {
    let captures = STRICT_VERSION_REGEX.captures(input)?;

    let number = |name: &str| -> Option<u64> {
        captures.name(name).map_or(Some(0), |m| m.as_str().parse().ok())
    };

    let pre = match captures.name("prerelease") {
        Some(m) => Prerelease::new(&trim_numeric_identifiers(m.as_str())).ok()?,
        None => Prerelease::EMPTY,
    };

    let build = match captures.name("build") {
        Some(m) => BuildMetadata::new(m.as_str()).ok()?,
        None => BuildMetadata::EMPTY,
    };

    Some(Version {
        major: captures["major"].parse().ok()?,
        minor: number("minor")?,
        patch: number("patch")?,
        pre,
        build,
    })
}

/// A predicate over semantic versions built from a constraint expression.
///
/// Accepts the [`VersionReq`] grammar (`>= 1.2`, `^2.0.0`, `~1.4`,
/// `>=1.0, <2.0`) and `||` separated alternatives.
#[derive(Debug, Clone)]
pub struct Constraint {
    expr: String,
    alternatives: Vec<VersionReq>,
}

impl Constraint {
    /// Parse a constraint expression.
    pub fn parse(expr: &str) -> Result<Self> {
        let alternatives = expr
            .split("||")
            .map(|alt| {
                VersionReq::parse(alt.trim())
                    .map_err(|err| ReqcheckError::constraint(expr, err))
            })
            .collect::<Result<Vec<VersionReq>>>()?;

        Ok(Self {
            expr: expr.to_string(),
            alternatives,
        })
    }

    /// Build a constraint by substituting `version` for the `%s`
    /// placeholder in `format` (e.g. `">= %s"` or `"^%s"`).
    pub fn from_format(format: &str, version: &str) -> Result<Self> {
        Self::parse(&format.replace(VERSION_PLACEHOLDER, version))
    }

    pub fn matches(&self, version: &Version) -> bool {
        self.alternatives.iter().any(|req| req.matches(version))
    }

    pub fn as_str(&self) -> &str {
        &self.expr
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)
    }
}
