//! Release discovery for the core repository.
//!
//! Tags are grouped into `major.minor` lines. The most recent `cutoff` lines
//! stay online (only their newest tag is built), older lines are retired, and
//! the `latest` pseudo-version built from the default branch is always present.

pub mod git;
mod semver;

use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, instrument};

use docsite_shared::{Result, VERSION_LATEST, VERSION_MAIN};

pub use semver::{Prerelease, SemVer};

// ---------------------------------------------------------------------------
// VersionSet
// ---------------------------------------------------------------------------

/// Outcome of version discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionSet {
    /// Newest tag of each ongoing line (newest first), then `latest`.
    pub versions: Vec<String>,
    /// `major.minor` of every ongoing line, newest first.
    pub ongoing: Vec<String>,
    /// `major.minor` of every retired line, newest first.
    pub retired: Vec<String>,
}

impl VersionSet {
    /// The set used when a repository has no usable tags.
    pub fn latest_only() -> Self {
        Self {
            versions: vec![VERSION_LATEST.to_string()],
            ongoing: Vec::new(),
            retired: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

/// Split `tags` into ongoing and retired `major.minor` lines.
///
/// Invalid tags are ignored. When nothing parses the result is
/// [`VersionSet::latest_only`].
#[instrument(skip_all, fields(tags = tags.len(), cutoff = cutoff))]
pub fn discover_versions<S: AsRef<str>>(tags: &[S], cutoff: usize) -> VersionSet {
    let mut parsed: Vec<(SemVer, &str)> = tags
        .iter()
        .map(AsRef::as_ref)
        .filter_map(|tag| SemVer::parse(tag).map(|v| (v, tag)))
        .collect();

    if parsed.is_empty() {
        debug!("no valid semver tags, building latest only");
        return VersionSet::latest_only();
    }

    // Newest first; identical precedence falls back to the tag text.
    parsed.sort_by(|(a, ta), (b, tb)| b.cmp(a).then_with(|| tb.cmp(ta)));

    let mut groups: Vec<String> = Vec::new();
    let mut newest_in_group: Vec<&str> = Vec::new();
    for (version, tag) in &parsed {
        let mm = version.majmin();
        if !groups.contains(&mm) {
            groups.push(mm);
            newest_in_group.push(tag);
        }
    }

    let split = cutoff.min(groups.len());
    let retired = groups.split_off(split);
    let mut versions: Vec<String> = newest_in_group[..split]
        .iter()
        .map(|tag| (*tag).to_string())
        .collect();
    versions.push(VERSION_LATEST.to_string());

    info!(
        ongoing = ?groups,
        retired = ?retired,
        "discovered versions"
    );

    VersionSet {
        versions,
        ongoing: groups,
        retired,
    }
}

/// Read the repository's tags and run [`discover_versions`].
pub fn discover_repo_versions(repo: &Path, cutoff: usize) -> Result<VersionSet> {
    let tags = git::list_tags(repo)?;
    Ok(discover_versions(&tags, cutoff))
}

/// Highest stable release among `versions`, ignoring `latest`, `main` and
/// prereleases.
pub fn find_current_version<S: AsRef<str>>(versions: &[S]) -> Option<String> {
    versions
        .iter()
        .map(AsRef::as_ref)
        .filter(|v| *v != VERSION_LATEST && *v != VERSION_MAIN)
        .filter_map(|v| SemVer::parse(v).map(|parsed| (parsed, v)))
        .filter(|(parsed, _)| !parsed.is_prerelease())
        .max_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(_, v)| v.to_string())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// `major.minor` of a tag (`"v0.54.2"` → `"0.54"`).
pub fn majmin(tag: &str) -> Option<String> {
    SemVer::parse(tag).map(|v| v.majmin())
}

/// Whether a tag is a valid semver prerelease.
pub fn is_prerelease(tag: &str) -> bool {
    SemVer::parse(tag).is_some_and(|v| v.is_prerelease())
}

/// Output directory name of a version: `latest` or `vMAJOR.MINOR`.
pub fn version_dir(version: &str) -> String {
    if version == VERSION_LATEST {
        return VERSION_LATEST.to_string();
    }
    match majmin(version) {
        Some(mm) => format!("v{mm}"),
        None => version.to_string(),
    }
}
