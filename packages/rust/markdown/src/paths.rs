//! Source path to site path mapping.
//!
//! Legacy docs ordered pages with numeric prefixes (`010_user-guide/`). The
//! site orders its menu on its own, so prefixes are dropped and a few legacy
//! sections are moved according to the tables in [`crate::compat`].

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::compat;
use crate::transform::{LINK_RE, is_external};

/// Destination of one source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    /// Path relative to the version directory, `/`-separated.
    pub newfile: String,
    /// The document was collapsed from a single-file legacy directory.
    pub collapsed: bool,
}

/// Strip one leading `<digits>_` from a path segment.
pub fn strip_numeric_prefix(segment: &str) -> &str {
    static PREFIX_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^\d+_").expect("valid regex"));

    match PREFIX_RE.find(segment) {
        Some(m) => &segment[m.end()..],
        None => segment,
    }
}

/// Map a path relative to the core `docs/` directory to its site path.
///
/// `README.md` becomes `index.md`. A directory listed in
/// [`compat::SINGLE_FILE_COLLAPSES`] only collapses its `index.md`; any other
/// file in it keeps its name.
pub fn generate_file_metadata(source: &str) -> FileMetadata {
    let mut segments: Vec<&str> = source
        .split(['/', '\\'])
        .filter(|s| !s.is_empty() && *s != ".")
        .map(strip_numeric_prefix)
        .collect();

    let filename = match segments.pop() {
        Some("README.md") => "index.md",
        Some(name) => name,
        None => "index.md",
    };
    let dir = segments.join("/");

    if filename == "index.md" {
        if let Some(target) = compat::single_file_collapse(&dir) {
            return FileMetadata {
                newfile: target.to_string(),
                collapsed: true,
            };
        }
    }

    let dir = compat::structural_rename(&dir).unwrap_or(dir);
    let newfile = if dir.is_empty() || dir == "." {
        filename.to_string()
    } else {
        format!("{dir}/{filename}")
    };

    FileMetadata {
        newfile,
        collapsed: false,
    }
}

/// Drop numeric prefixes from every segment of relative link targets.
///
/// `[Guide](2_folder/3_subfolder/1_file.md)` → `[Guide](folder/subfolder/file.md)`.
pub fn rewrite_numbered_file_links(text: &str) -> String {
    LINK_RE
        .replace_all(text, |caps: &Captures| {
            let label = &caps[1];
            let url = &caps[2];
            if is_external(url) || url.starts_with('#') {
                return caps[0].to_string();
            }

            let (path, fragment) = match url.split_once('#') {
                Some((path, frag)) => (path, Some(frag)),
                None => (url, None),
            };
            let cleaned: Vec<&str> = path.split('/').map(strip_numeric_prefix).collect();
            let mut out = format!("[{label}]({}", cleaned.join("/"));
            if let Some(frag) = fragment {
                out.push('#');
                out.push_str(frag);
            }
            out.push(')');
            out
        })
        .into_owned()
}
