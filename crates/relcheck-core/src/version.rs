//! Toolchain version normalization and semantic-version ordering.
//!
//! Version strings are accepted with or without the `rustc` runtime prefix
//! and with or without the leading `v` marker. [`normalize_version`] brings
//! all of them to one canonical form (`v1.20` → `v1.20.0`) so that
//! `"1.20"`, `"rustc 1.20"` and `"v1.20"` compare equal.

use std::cmp::Ordering;
use std::fmt;

use crate::error::{ReleaseError, Result, VersionSide};

/// Prefix carried by toolchain-reported versions (`rustc 1.82.0 (...)`).
pub const RUNTIME_PREFIX: &str = "rustc";

/// Leading marker of the canonical form.
pub const VERSION_MARKER: char = 'v';

// ---------------------------------------------------------------------------
// Parsed version
// ---------------------------------------------------------------------------

/// A single dot-separated prerelease identifier.
///
/// Variant order matters: numeric identifiers sort below alphanumeric ones.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Identifier {
    Numeric(u64),
    Alpha(String),
}

impl Identifier {
    fn parse(input: &str) -> Option<Self> {
        if input.is_empty() || !input.chars().all(is_ident_char) {
            return None;
        }
        if input.chars().all(|c| c.is_ascii_digit()) {
            return numeric(input).map(Self::Numeric);
        }
        Some(Self::Alpha(input.to_string()))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{n}"),
            Self::Alpha(s) => f.write_str(s),
        }
    }
}

/// Parsed semantic version: `vMAJOR[.MINOR[.PATCH[-PRERELEASE][+BUILD]]]`.
///
/// Build metadata is validated but not kept; it never affects ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pre: Vec<Identifier>,
}

impl Version {
    /// Parse a marked version string (`v1.2.3`, `v1.2`, `v1`, `v1.0.0-rc.1+meta`).
    ///
    /// The shorthand forms `vMAJOR` and `vMAJOR.MINOR` may not carry a
    /// prerelease or build suffix.
    pub fn parse(input: &str) -> Option<Self> {
        let rest = input.strip_prefix(VERSION_MARKER)?;

        let (rest, build) = match rest.split_once('+') {
            Some((v, b)) => (v, Some(b)),
            None => (rest, None),
        };
        if let Some(build) = build {
            if !build
                .split('.')
                .all(|id| !id.is_empty() && id.chars().all(is_ident_char))
            {
                return None;
            }
        }

        let (core, pre) = match rest.split_once('-') {
            Some((c, p)) => (c, Some(p)),
            None => (rest, None),
        };

        let parts: Vec<&str> = core.split('.').collect();
        if parts.len() > 3 || (parts.len() < 3 && (pre.is_some() || build.is_some())) {
            return None;
        }

        let major = numeric(parts[0])?;
        let minor = parts.get(1).map_or(Some(0), |p| numeric(p))?;
        let patch = parts.get(2).map_or(Some(0), |p| numeric(p))?;

        let pre = match pre {
            Some(p) => p
                .split('.')
                .map(Identifier::parse)
                .collect::<Option<Vec<_>>>()?,
            None => Vec::new(),
        };

        Some(Self {
            major,
            minor,
            patch,
            pre,
        })
    }

    /// Whether this version carries a prerelease suffix.
    pub fn is_prerelease(&self) -> bool {
        !self.pre.is_empty()
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let tuple_cmp =
            (self.major, self.minor, self.patch).cmp(&(other.major, other.minor, other.patch));
        if tuple_cmp != Ordering::Equal {
            return tuple_cmp;
        }
        // Same numeric version: pre-release < release
        match (self.pre.is_empty(), other.pre.is_empty()) {
            (true, true) => Ordering::Equal,
            (false, true) => Ordering::Less,
            (true, false) => Ordering::Greater,
            (false, false) => self.pre.cmp(&other.pre),
        }
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{VERSION_MARKER}{}.{}.{}",
            self.major, self.minor, self.patch
        )?;
        for (i, id) in self.pre.iter().enumerate() {
            f.write_str(if i == 0 { "-" } else { "." })?;
            write!(f, "{id}")?;
        }
        Ok(())
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-'
}

/// Digits only, no leading zeros (except `0` itself).
fn numeric(input: &str) -> Option<u64> {
    if input.is_empty() || !input.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if input.len() > 1 && input.starts_with('0') {
        return None;
    }
    input.parse().ok()
}

// ---------------------------------------------------------------------------
// Normalization and comparison
// ---------------------------------------------------------------------------

/// Strip surrounding whitespace and the `rustc` prefix.
///
/// When the prefix is present only the first whitespace-separated token
/// after it is kept, so full `rustc --version` output is accepted.
fn strip_runtime_prefix(raw: &str) -> &str {
    let trimmed = raw.trim();
    match trimmed.strip_prefix(RUNTIME_PREFIX) {
        Some(rest) => rest.split_whitespace().next().unwrap_or(""),
        None => trimmed,
    }
}

/// Canonicalize a version string.
///
/// Idempotent. Strings that are not valid versions come back with the
/// prefix removed and the marker added, but are otherwise untouched.
pub fn normalize_version(raw: &str) -> String {
    let unprefixed = strip_runtime_prefix(raw);
    let marked = if unprefixed.starts_with(VERSION_MARKER) {
        unprefixed.to_string()
    } else {
        format!("{VERSION_MARKER}{unprefixed}")
    };

    match Version::parse(&marked) {
        Some(version) => version.to_string(),
        None => marked,
    }
}

/// Normalize and parse, reporting failures against `side`.
pub(crate) fn parse_normalized(raw: &str, side: VersionSide) -> Result<Version> {
    Version::parse(&normalize_version(raw)).ok_or_else(|| ReleaseError::InvalidVersion {
        side,
        version: raw.to_string(),
    })
}

/// Compare two version literals after normalization.
///
/// `current` is reported as [`VersionSide::Current`] and `target` as
/// [`VersionSide::Target`] when either fails to parse.
pub fn compare_versions(current: &str, target: &str) -> Result<Ordering> {
    let current = parse_normalized(current, VersionSide::Current)?;
    let target = parse_normalized(target, VersionSide::Target)?;
    Ok(current.cmp(&target))
}

/// Extract the integer major and minor components of a version string.
pub fn parse_major_minor(raw: &str) -> Result<(u64, u64)> {
    let unprefixed = strip_runtime_prefix(raw);
    let bare = unprefixed
        .strip_prefix(VERSION_MARKER)
        .unwrap_or(unprefixed);

    let malformed = |reason: String| ReleaseError::MalformedVersion {
        version: raw.to_string(),
        reason,
    };

    let parts: Vec<&str> = bare.split('.').collect();
    if parts.len() < 2 {
        return Err(malformed(
            "expected at least major.minor components".to_string(),
        ));
    }

    let major = parts[0]
        .parse::<u64>()
        .map_err(|_| malformed(format!("invalid major component {:?}", parts[0])))?;
    let minor = parts[1]
        .parse::<u64>()
        .map_err(|_| malformed(format!("invalid minor component {:?}", parts[1])))?;

    Ok((major, minor))
}
