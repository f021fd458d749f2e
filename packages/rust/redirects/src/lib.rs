//! Redirect rules for the hosting platform.
//!
//! The rules file is plain text, one `from  to  status` rule per line, read
//! by the host's routing layer. It is regenerated on every build and never
//! read back.

use std::collections::HashSet;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, instrument};

use docsite_shared::{DocsiteError, Result, VERSION_LATEST};
use docsite_versions::{SemVer, git};

/// Status code of every generated rule.
pub const STATUS_MOVED_PERMANENTLY: u16 = 301;

/// Placeholder carrying the matched wildcard into the destination.
pub const SPLAT: &str = ":splat";

/// Legacy site paths and where their content lives now.
pub const MANUAL_REDIRECTS: &[(&str, &str)] = &[
    ("/main", "/"),
    ("/pepr-tutorials", "/tutorials"),
    ("/user-guide/actions", "/actions"),
    ("/module-examples", "/reference/module-examples"),
    ("/best-practices", "/reference/best-practices"),
    ("/faq", "/reference/faq"),
    ("/community/code_of_conduct", "/community/code-of-conduct"),
];

const BANNER: &str = "\
# This file is generated by docsite on every build. DO NOT EDIT.
# Changes belong in the redirect tables of the docsite-redirects crate.
";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One `from -> to` rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedirectRule {
    pub from: String,
    pub to: String,
    pub status: u16,
}

impl RedirectRule {
    fn moved(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            status: STATUS_MOVED_PERMANENTLY,
        }
    }
}

/// Rules grouped by the reason they exist, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedirectTable {
    pub retired: Vec<RedirectRule>,
    pub manual: Vec<RedirectRule>,
    pub patch: Vec<RedirectRule>,
    pub examples: Vec<RedirectRule>,
}

/// Number of rules per section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RedirectCounts {
    pub total: usize,
    pub retired: usize,
    pub manual: usize,
    pub patch: usize,
    pub examples: usize,
}

impl RedirectTable {
    fn sections(&self) -> [(&'static str, &[RedirectRule]); 4] {
        [
            ("Retired versions redirect to the site root", &self.retired),
            ("Legacy paths", &self.manual),
            ("Patch releases redirect to their minor version", &self.patch),
            ("Versioned examples redirect to the shared examples", &self.examples),
        ]
    }

    pub fn counts(&self) -> RedirectCounts {
        RedirectCounts {
            total: self.retired.len() + self.manual.len() + self.patch.len() + self.examples.len(),
            retired: self.retired.len(),
            manual: self.manual.len(),
            patch: self.patch.len(),
            examples: self.examples.len(),
        }
    }

    /// All rules in file order.
    pub fn rules(&self) -> impl Iterator<Item = &RedirectRule> {
        self.retired
            .iter()
            .chain(&self.manual)
            .chain(&self.patch)
            .chain(&self.examples)
    }

    /// Render the rules file: banner, then each section under a `#` header,
    /// with the source column padded so destinations line up.
    pub fn render(&self) -> String {
        let width = self.rules().map(|r| r.from.len()).max().unwrap_or(0);
        let to_width = self.rules().map(|r| r.to.len()).max().unwrap_or(0);

        let mut out = String::from(BANNER);
        for (title, rules) in self.sections() {
            out.push('\n');
            out.push_str(&format!("# {title}\n"));
            for rule in rules {
                out.push_str(&format!(
                    "{:<width$}  {:<to_width$}  {}\n",
                    rule.from, rule.to, rule.status
                ));
            }
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Build, render and write the rules file for the core repository.
///
/// `retired` holds `major.minor` strings, `versions` the active version tags
/// (`latest` included or not).
#[instrument(skip_all, fields(output = %output.display(), retired = retired.len(), versions = versions.len()))]
pub fn generate_redirects(
    core_repo: &Path,
    retired: &[String],
    versions: &[String],
    output: &Path,
) -> Result<RedirectCounts> {
    let tags = git::list_tags(core_repo)?;
    let table = build_redirects(&tags, retired, versions);
    let counts = table.counts();

    write_atomic(output, &table.render())?;

    info!(
        total = counts.total,
        retired = counts.retired,
        manual = counts.manual,
        patch = counts.patch,
        examples = counts.examples,
        "redirects written"
    );
    Ok(counts)
}

/// Compute every section of the table.
pub fn build_redirects<S: AsRef<str>>(
    all_tags: &[S],
    retired: &[String],
    versions: &[String],
) -> RedirectTable {
    RedirectTable {
        retired: retired_rules(all_tags, retired),
        manual: MANUAL_REDIRECTS
            .iter()
            .map(|(from, to)| {
                let (from, to) = normalize_manual(from, to);
                RedirectRule::moved(from, to)
            })
            .collect(),
        patch: patch_rules(versions),
        examples: example_rules(versions),
    }
}

/// Make a manual rule a wildcard rule: the source ends in `/*`, the
/// destination in `/:splat`. Already-normalized entries are left as is.
pub fn normalize_manual(from: &str, to: &str) -> (String, String) {
    let from = if from.ends_with("/*") {
        from.to_string()
    } else {
        format!("{}/*", from.trim_end_matches('/'))
    };

    let to = if to.ends_with(SPLAT) {
        to.to_string()
    } else {
        format!("{}/{SPLAT}", to.trim_end_matches('/'))
    };

    (from, to)
}

fn retired_rules<S: AsRef<str>>(all_tags: &[S], retired: &[String]) -> Vec<RedirectRule> {
    let mut tags: Vec<(SemVer, &str)> = all_tags
        .iter()
        .map(AsRef::as_ref)
        .filter_map(|tag| SemVer::parse(tag).map(|v| (v, tag)))
        .collect();
    tags.sort_by(|(a, _), (b, _)| b.cmp(a));

    let mut rules = Vec::new();
    for mm in retired {
        rules.push(RedirectRule::moved(format!("/v{mm}/*"), "/"));

        for (_, tag) in tags.iter().filter(|(v, _)| v.majmin() == *mm) {
            rules.push(RedirectRule::moved(format!("{}/*", tag_path(tag)), "/"));
        }
    }
    debug!(count = rules.len(), "retired rules");
    rules
}

fn patch_rules(versions: &[String]) -> Vec<RedirectRule> {
    let mut rules = Vec::new();
    for (version, tag) in stable_versions(versions) {
        let patch = tag_path(tag);
        let minor = format!("/v{}", version.majmin());
        rules.push(RedirectRule::moved(patch.clone(), minor.clone()));
        rules.push(RedirectRule::moved(
            format!("{patch}/*"),
            format!("{minor}/{SPLAT}"),
        ));
    }
    rules
}

fn example_rules(versions: &[String]) -> Vec<RedirectRule> {
    let mut seen = HashSet::new();
    stable_versions(versions)
        .filter_map(|(version, _)| {
            let mm = version.majmin();
            seen.insert(mm.clone()).then(|| {
                RedirectRule::moved(format!("/v{mm}/examples/*"), format!("/examples/{SPLAT}"))
            })
        })
        .collect()
}

/// Active tags that are concrete releases: no `latest`, no prereleases.
fn stable_versions(versions: &[String]) -> impl Iterator<Item = (SemVer, &str)> {
    versions
        .iter()
        .map(String::as_str)
        .filter(|v| *v != VERSION_LATEST)
        .filter_map(|v| SemVer::parse(v).map(|parsed| (parsed, v)))
        .filter(|(parsed, _)| !parsed.is_prerelease())
}

/// `/v<version>` for a tag written with or without the `v`.
fn tag_path(tag: &str) -> String {
    format!("/v{}", tag.trim_start_matches('=').trim_start_matches('v'))
}

fn write_atomic(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| DocsiteError::io(parent, e))?;
    }

    let temp = path.with_extension("tmp");
    std::fs::write(&temp, content).map_err(|e| DocsiteError::io(&temp, e))?;
    std::fs::rename(&temp, path).map_err(|e| DocsiteError::io(path, e))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
