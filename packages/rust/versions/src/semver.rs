//! Semantic version parsing and precedence.
//!
//! Accepts an optional `v` (or `=`) in front of `MAJOR.MINOR.PATCH`, followed
//! by optional `-prerelease` and `+build` parts. Precedence follows semver
//! 2.0: build metadata is ignored and a prerelease sorts before its release.

use std::cmp::Ordering;
use std::fmt;

/// One dot-separated prerelease identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prerelease {
    Numeric(u64),
    Alpha(String),
}

impl Ord for Prerelease {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Numeric(a), Self::Numeric(b)) => a.cmp(b),
            (Self::Numeric(_), Self::Alpha(_)) => Ordering::Less,
            (Self::Alpha(_), Self::Numeric(_)) => Ordering::Greater,
            (Self::Alpha(a), Self::Alpha(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for Prerelease {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Prerelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{n}"),
            Self::Alpha(s) => f.write_str(s),
        }
    }
}

/// A parsed semantic version.
#[derive(Debug, Clone)]
pub struct SemVer {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub pre: Vec<Prerelease>,
    pub build: Option<String>,
}

impl SemVer {
    /// Parse a tag such as `v1.2.3`, `1.2.3-rc.1` or `=1.2.3+build.5`.
    ///
    /// Returns `None` for anything that is not a valid semantic version.
    pub fn parse(input: &str) -> Option<Self> {
        let s = input.trim();
        let s = s.strip_prefix('=').unwrap_or(s);
        let s = s.strip_prefix('v').unwrap_or(s);

        let (rest, build) = match s.split_once('+') {
            Some((rest, build)) => {
                if !build.split('.').all(is_valid_identifier) {
                    return None;
                }
                (rest, Some(build.to_string()))
            }
            None => (s, None),
        };

        let (core, pre) = match rest.split_once('-') {
            Some((core, pre)) => (core, parse_prerelease(pre)?),
            None => (rest, Vec::new()),
        };

        let mut parts = core.split('.');
        let major = parse_numeric(parts.next()?)?;
        let minor = parse_numeric(parts.next()?)?;
        let patch = parse_numeric(parts.next()?)?;
        if parts.next().is_some() {
            return None;
        }

        Some(Self {
            major,
            minor,
            patch,
            pre,
            build,
        })
    }

    /// Whether this version carries a prerelease suffix.
    pub fn is_prerelease(&self) -> bool {
        !self.pre.is_empty()
    }

    /// The `MAJOR.MINOR` line this version belongs to.
    pub fn majmin(&self) -> String {
        format!("{}.{}", self.major, self.minor)
    }
}

impl PartialEq for SemVer {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SemVer {}

impl Ord for SemVer {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            .then_with(|| match (self.pre.is_empty(), other.pre.is_empty()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => self.pre.cmp(&other.pre),
            })
    }
}

impl PartialOrd for SemVer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for SemVer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if !self.pre.is_empty() {
            let pre: Vec<String> = self.pre.iter().map(ToString::to_string).collect();
            write!(f, "-{}", pre.join("."))?;
        }
        if let Some(build) = &self.build {
            write!(f, "+{build}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A numeric component: digits only, no leading zero except `0` itself.
fn parse_numeric(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if s.len() > 1 && s.starts_with('0') {
        return None;
    }
    s.parse().ok()
}

fn is_valid_identifier(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

fn parse_prerelease(s: &str) -> Option<Vec<Prerelease>> {
    s.split('.')
        .map(|id| {
            if !is_valid_identifier(id) {
                return None;
            }
            if id.bytes().all(|b| b.is_ascii_digit()) {
                parse_numeric(id).map(Prerelease::Numeric)
            } else {
                Some(Prerelease::Alpha(id.to_string()))
            }
        })
        .collect()
}
