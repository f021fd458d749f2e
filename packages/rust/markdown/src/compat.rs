//! Routing and compatibility tables.
//!
//! Older documentation tags used numbered directory prefixes, a different
//! section layout and several spellings of the community files. Everything
//! that exists only to keep those tags building lives here, so a table entry
//! can be deleted once the last tag that needs it is retired.

/// Legacy directory prefixes (already stripped of numeric prefixes) and the
/// section they moved to.
pub const STRUCTURAL_RENAMES: &[(&str, &str)] = &[
    ("pepr-tutorials", "tutorials"),
    ("user-guide/actions", "actions"),
    ("module-examples", "reference/module-examples"),
];

/// Legacy directories that only ever held a `README.md`; the page is
/// collapsed into one file under the reference section.
pub const SINGLE_FILE_COLLAPSES: &[(&str, &str)] = &[
    ("best-practices", "reference/best-practices.md"),
    ("faq", "reference/faq.md"),
    ("roadmap", "roadmap.md"),
];

/// Community files kept at the core repository root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootFile {
    /// Canonical page name (without `.md`).
    pub canonical: &'static str,
    /// File names this page has had in the repository root, newest first.
    pub sources: &'static [&'static str],
}

/// Root community files, relocated into [`COMMUNITY_SECTION`].
pub const ROOT_FILES: &[RootFile] = &[
    RootFile {
        canonical: "code-of-conduct",
        sources: &["CODE_OF_CONDUCT.md", "CODE-OF-CONDUCT.md"],
    },
    RootFile {
        canonical: "security",
        sources: &["SECURITY.md"],
    },
    RootFile {
        canonical: "support",
        sources: &["SUPPORT.md"],
    },
];

/// Section that receives the relocated root files.
pub const COMMUNITY_SECTION: &str = "community";

/// Canonical page name for a root file basename (case-insensitive, with or
/// without `.md`).
pub fn root_file_canonical(basename: &str) -> Option<&'static str> {
    let stem = strip_md_ci(basename);
    ROOT_FILES.iter().find_map(|file| {
        file.sources
            .iter()
            .any(|source| strip_md_ci(source).eq_ignore_ascii_case(stem))
            .then_some(file.canonical)
    })
}

/// Structural rename for a cleaned directory, on a whole-segment boundary.
pub fn structural_rename(dir: &str) -> Option<String> {
    STRUCTURAL_RENAMES.iter().find_map(|(from, to)| {
        if dir == *from {
            return Some((*to).to_string());
        }
        dir.strip_prefix(from)
            .and_then(|rest| rest.strip_prefix('/'))
            .map(|rest| format!("{to}/{rest}"))
    })
}

/// Collapse target for a cleaned directory, if it is a single-file legacy
/// directory.
pub fn single_file_collapse(dir: &str) -> Option<&'static str> {
    SINGLE_FILE_COLLAPSES
        .iter()
        .find(|(from, _)| *from == dir)
        .map(|(_, to)| *to)
}

fn strip_md_ci(name: &str) -> &str {
    match name.len().checked_sub(3) {
        Some(cut) if name.is_char_boundary(cut) && name[cut..].eq_ignore_ascii_case(".md") => {
            &name[..cut]
        }
        _ => name,
    }
}
