//! Locating inputs in the core and examples repositories.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use docsite_markdown::compat::RootFile;
use docsite_shared::{DocsiteError, Result};

/// Directory of the core repository holding the Markdown docs.
pub const DOCS_DIR: &str = "docs";

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "svg", "webp"];

/// Every `.md` file under `docs_dir`, as sorted `/`-separated relative paths.
///
/// The top-level `README.md` is skipped; the version landing page is built
/// from the repository root instead.
#[instrument(skip_all, fields(docs_dir = %docs_dir.display()))]
pub fn collect_doc_sources(docs_dir: &Path) -> Result<Vec<String>> {
    if !docs_dir.is_dir() {
        return Err(DocsiteError::validation(format!(
            "docs directory not found: {}",
            docs_dir.display()
        )));
    }

    let mut sources: Vec<String> = WalkDir::new(docs_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().and_then(|ext| ext.to_str()) == Some("md"))
        .filter_map(|e| relative_slash_path(docs_dir, e.path()))
        .filter(|rel| rel != "README.md")
        .collect();
    sources.sort();

    debug!(count = sources.len(), "collected doc sources");
    Ok(sources)
}

/// Copy `docs/_images/*` and every image under `docs/resources/` into
/// `assets_dir`, flattened to their file names.
///
/// A missing source directory is logged and skipped.
#[instrument(skip_all, fields(assets_dir = %assets_dir.display()))]
pub fn copy_images(docs_dir: &Path, assets_dir: &Path) -> Result<usize> {
    std::fs::create_dir_all(assets_dir).map_err(|e| DocsiteError::io(assets_dir, e))?;

    let mut copied = 0;

    let images_dir = docs_dir.join("_images");
    if images_dir.is_dir() {
        for entry in WalkDir::new(&images_dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            copy_into(entry.path(), assets_dir)?;
            copied += 1;
        }
    } else {
        warn!(path = %images_dir.display(), "no _images directory, skipping");
    }

    let resources_dir = docs_dir.join("resources");
    if resources_dir.is_dir() {
        for entry in WalkDir::new(&resources_dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| is_image(e.path()))
        {
            copy_into(entry.path(), assets_dir)?;
            copied += 1;
        }
    } else {
        warn!(path = %resources_dir.display(), "no resources directory, skipping");
    }

    debug!(copied, "images copied");
    Ok(copied)
}

/// First spelling of a community file present at the repository root.
pub fn find_root_file(core_repo: &Path, file: &RootFile) -> Option<PathBuf> {
    file.sources
        .iter()
        .map(|name| core_repo.join(name))
        .find(|path| path.is_file())
}

/// Top-level directories of the examples repository that carry a
/// `README.md`, as `(name, readme path)` sorted by name.
pub fn collect_examples(examples_repo: &Path) -> Result<Vec<(String, PathBuf)>> {
    let entries =
        std::fs::read_dir(examples_repo).map_err(|e| DocsiteError::io(examples_repo, e))?;

    let mut examples = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| DocsiteError::io(examples_repo, e))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') {
            continue;
        }

        let readme = path.join("README.md");
        if readme.is_file() {
            examples.push((name, readme));
        } else {
            debug!(example = %name, "no README.md, skipping");
        }
    }
    examples.sort();
    Ok(examples)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn relative_slash_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect();
    Some(parts.join("/"))
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

fn copy_into(file: &Path, dir: &Path) -> Result<()> {
    let Some(name) = file.file_name() else {
        return Ok(());
    };
    let target = dir.join(name);
    std::fs::copy(file, &target).map_err(|e| DocsiteError::io(&target, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path, content: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn doc_sources_skip_top_level_readme() {
        let dir = tempfile::tempdir().unwrap();
        let docs = dir.path();
        touch(&docs.join("README.md"), "# Docs");
        touch(&docs.join("010_user-guide/README.md"), "# Guide");
        touch(&docs.join("010_user-guide/020_cli.md"), "# CLI");
        touch(&docs.join("_images/arch.png"), "png");

        let sources = collect_doc_sources(docs).unwrap();
        assert_eq!(sources, vec!["010_user-guide/020_cli.md", "010_user-guide/README.md"]);
    }

    #[test]
    fn missing_docs_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(collect_doc_sources(&dir.path().join("docs")).is_err());
    }

    #[test]
    fn images_are_flattened_into_assets() {
        let dir = tempfile::tempdir().unwrap();
        let docs = dir.path().join("docs");
        let assets = dir.path().join("public/assets");
        touch(&docs.join("_images/arch.png"), "a");
        touch(&docs.join("resources/030_create-pepr-operator/light.png"), "b");
        touch(&docs.join("resources/030_create-pepr-operator/notes.txt"), "c");

        let copied = copy_images(&docs, &assets).unwrap();
        assert_eq!(copied, 2);
        assert!(assets.join("arch.png").is_file());
        assert!(assets.join("light.png").is_file());
        assert!(!assets.join("notes.txt").exists());
    }

    #[test]
    fn missing_image_dirs_are_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let copied = copy_images(&dir.path().join("docs"), &dir.path().join("assets")).unwrap();
        assert_eq!(copied, 0);
    }

    #[test]
    fn root_file_prefers_first_spelling_present() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("CODE-OF-CONDUCT.md"), "# Conduct");

        let file = &docsite_markdown::compat::ROOT_FILES[0];
        let found = find_root_file(dir.path(), file).unwrap();
        assert!(found.ends_with("CODE-OF-CONDUCT.md"));
        assert!(find_root_file(dir.path(), &docsite_markdown::compat::ROOT_FILES[1]).is_none());
    }

    #[test]
    fn examples_need_a_readme() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("hello-pepr/README.md"), "# Hello");
        touch(&dir.path().join("no-readme/index.ts"), "");
        touch(&dir.path().join(".github/README.md"), "# CI");
        touch(&dir.path().join("README.md"), "# Examples");

        let examples = collect_examples(dir.path()).unwrap();
        assert_eq!(examples.len(), 1);
        assert_eq!(examples[0].0, "hello-pepr");
    }
}
