//! Per-version sidebar configuration.
//!
//! The site's versioning plugin reads one `<versions_dir>/vMAJOR.MINOR.json`
//! per archived version. Each top-level section of the version becomes an
//! autogenerated sidebar group; loose top-level pages become plain links.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, instrument};

use docsite_shared::{DocsiteError, Result, VERSION_LATEST};
use docsite_versions::version_dir;

/// Contents of one navigation JSON file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationConfig {
    pub sidebar: Vec<SidebarItem>,
}

/// One sidebar entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SidebarItem {
    /// A section whose entries the site generates from a directory.
    Group {
        label: String,
        autogenerate: Autogenerate,
    },
    /// A single page.
    Link { label: String, link: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Autogenerate {
    pub directory: String,
}

/// Sidebar for the version rendered under `<content_dir>/<dir_name>`.
///
/// Groups come first, then links, each ordered by label.
pub fn build_navigation(version_root: &Path, dir_name: &str) -> Result<NavigationConfig> {
    let entries =
        std::fs::read_dir(version_root).map_err(|e| DocsiteError::io(version_root, e))?;

    let mut groups = Vec::new();
    let mut links = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| DocsiteError::io(version_root, e))?;
        let name = entry.file_name().to_string_lossy().to_string();
        let path = entry.path();

        if path.is_dir() {
            groups.push(SidebarItem::Group {
                label: title_from_path(&name),
                autogenerate: Autogenerate {
                    directory: format!("{dir_name}/{name}"),
                },
            });
        } else if let Some(stem) = name.strip_suffix(".md") {
            if stem == "index" {
                continue;
            }
            links.push(SidebarItem::Link {
                label: title_from_path(stem),
                link: format!("/{dir_name}/{stem}/"),
            });
        }
    }

    groups.sort_by(|a, b| label(a).cmp(label(b)));
    links.sort_by(|a, b| label(a).cmp(label(b)));
    groups.extend(links);

    Ok(NavigationConfig { sidebar: groups })
}

/// Write a navigation file for every built, non-`latest` version.
#[instrument(skip_all, fields(versions = versions.len()))]
pub fn write_navigation(
    content_dir: &Path,
    versions_dir: &Path,
    versions: &[String],
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(versions_dir).map_err(|e| DocsiteError::io(versions_dir, e))?;

    let mut written = Vec::new();
    for version in versions.iter().filter(|v| *v != VERSION_LATEST) {
        let dir_name = version_dir(version);
        let version_root = content_dir.join(&dir_name);
        if !version_root.is_dir() {
            debug!(%version, "version not built, no navigation");
            continue;
        }

        let nav = build_navigation(&version_root, &dir_name)?;
        let path = versions_dir.join(format!("{dir_name}.json"));
        write_json(&path, &nav)?;
        debug!(path = %path.display(), items = nav.sidebar.len(), "wrote navigation");
        written.push(path);
    }
    Ok(written)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn label(item: &SidebarItem) -> &str {
    match item {
        SidebarItem::Group { label, .. } | SidebarItem::Link { label, .. } => label,
    }
}

/// Human-readable label from a path slug.
fn title_from_path(slug: &str) -> String {
    slug.replace(['-', '_'], " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(c) => {
                    let upper: String = c.to_uppercase().collect();
                    format!("{upper}{}", chars.collect::<String>())
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn write_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(data).map_err(|e| DocsiteError::Json(e.to_string()))?;
    std::fs::write(path, json).map_err(|e| DocsiteError::io(path, e))
}
