//! Version directories inside the site content directory.
//!
//! ```text
//! <content_dir>/
//! ├── index.md, user-guide/, ...   (flattened from latest/)
//! ├── examples/
//! ├── v0.54/
//! └── v0.53/
//! ```

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info, instrument, warn};

use docsite_shared::{DocsiteError, Result, VERSION_LATEST};

/// Directory holding the rendered example pages.
pub const EXAMPLES_DIR: &str = "examples";

/// Whether a content directory entry is a built `vMAJOR.MINOR` version.
pub fn is_version_dir_name(name: &str) -> bool {
    static VERSION_DIR_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^v\d+\.\d+$").expect("valid regex"));
    VERSION_DIR_RE.is_match(name)
}

/// Delete the output directory of every retired `major.minor` line.
#[instrument(skip_all, fields(retired = retired.len()))]
pub fn prune_retired(content_dir: &Path, retired: &[String]) -> Result<Vec<PathBuf>> {
    let mut removed = Vec::new();
    for mm in retired {
        let dir = content_dir.join(format!("v{mm}"));
        if dir.exists() {
            remove_path(&dir)?;
            info!(path = %dir.display(), "removed retired version");
            removed.push(dir);
        }
    }
    Ok(removed)
}

/// Move `latest/` up into the content root.
///
/// Entries left at the root by the previous build are removed first; version
/// directories and examples are kept; a `latest/` directory of the same name
/// is merged into them.
#[instrument(skip_all, fields(content_dir = %content_dir.display()))]
pub fn flatten_latest(content_dir: &Path) -> Result<usize> {
    let latest = content_dir.join(VERSION_LATEST);
    if !latest.is_dir() {
        warn!(path = %latest.display(), "nothing to flatten");
        return Ok(0);
    }

    for entry in read_dir(content_dir)? {
        let name = entry.file_name().to_string_lossy().to_string();
        if name == VERSION_LATEST || name == EXAMPLES_DIR || is_version_dir_name(&name) {
            continue;
        }
        remove_path(&entry.path())?;
        debug!(entry = %name, "removed stale root entry");
    }

    let mut moved = 0;
    for entry in read_dir(&latest)? {
        let target = content_dir.join(entry.file_name());
        move_into(&entry.path(), &target)?;
        moved += 1;
    }

    std::fs::remove_dir_all(&latest).map_err(|e| DocsiteError::io(&latest, e))?;
    info!(moved, "flattened latest into content root");
    Ok(moved)
}

/// Remove a file or a directory tree.
pub fn remove_path(path: &Path) -> Result<()> {
    let result = if path.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };
    result.map_err(|e| DocsiteError::io(path, e))
}

/// Rename `from` to `to`. A directory landing on an existing directory is
/// merged entry by entry; files in `from` replace files in `to`.
fn move_into(from: &Path, to: &Path) -> Result<()> {
    if from.is_dir() && to.is_dir() {
        for entry in read_dir(from)? {
            move_into(&entry.path(), &to.join(entry.file_name()))?;
        }
        return std::fs::remove_dir(from).map_err(|e| DocsiteError::io(from, e));
    }
    if to.exists() {
        remove_path(to)?;
    }
    std::fs::rename(from, to).map_err(|e| DocsiteError::io(to, e))
}

fn read_dir(dir: &Path) -> Result<Vec<std::fs::DirEntry>> {
    std::fs::read_dir(dir)
        .map_err(|e| DocsiteError::io(dir, e))?
        .map(|entry| entry.map_err(|e| DocsiteError::io(dir, e)))
        .collect()
}
