//! Writing converted pages into a version directory.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use docsite_markdown::TransformedDocument;
use docsite_markdown::compat::{COMMUNITY_SECTION, ROOT_FILES};
use docsite_shared::{DocsiteError, Result, VERSION_LATEST};

use crate::layout::{EXAMPLES_DIR, remove_path};
use crate::pipeline::ProgressReporter;
use crate::sources::{collect_examples, find_root_file};

/// Convert and write every docs page, one task per file.
///
/// Every task runs to completion; failures are reported together as
/// [`DocsiteError::Aggregate`].
#[instrument(skip_all, fields(version = %version, files = sources.len()))]
pub async fn write_documents(
    docs_dir: &Path,
    version_root: &Path,
    version: &str,
    sources: Vec<String>,
    progress: &dyn ProgressReporter,
) -> Result<usize> {
    let total = sources.len();
    let mut handles = Vec::with_capacity(total);

    for source in sources {
        let input = docs_dir.join(&source);
        let root = version_root.to_path_buf();
        let version = version.to_string();

        handles.push(tokio::spawn(async move {
            let result = convert_file(&input, &source, &root, &version).await;
            (source, result)
        }));
    }

    let mut written = 0;
    let mut failures = Vec::new();
    for handle in handles {
        match handle.await {
            Ok((_, Ok(dest))) => {
                written += 1;
                progress.document_written(&dest, written, total);
            }
            Ok((source, Err(e))) => failures.push(format!("{source}: {e}")),
            Err(e) => failures.push(format!("task: {e}")),
        }
    }

    if !failures.is_empty() {
        return Err(DocsiteError::Aggregate {
            stage: format!("convert {version}"),
            failures,
        });
    }

    debug!(written, "documents written");
    Ok(written)
}

/// Relocate the community files kept at the repository root into the
/// version's community section. Files a tag does not have are skipped.
pub async fn write_community_pages(
    core_repo: &Path,
    version_root: &Path,
    version: &str,
) -> Result<usize> {
    let mut written = 0;
    for file in ROOT_FILES {
        let Some(path) = find_root_file(core_repo, file) else {
            debug!(page = file.canonical, "community file not present");
            continue;
        };

        let source = file_name(&path);
        let dest = format!("{COMMUNITY_SECTION}/{}.md", file.canonical);
        let content = read(&path).await?;
        let doc = docsite_markdown::transform_page(&source, &dest, &content, version)?;
        write_document(version_root, &doc).await?;
        written += 1;
    }
    Ok(written)
}

/// Build `index.md` of a version from the repository root `README.md`.
pub async fn write_landing_page(core_repo: &Path, version_root: &Path, version: &str) -> Result<()> {
    let readme = core_repo.join("README.md");
    let content = read(&readme).await?;
    let doc = docsite_markdown::transform_landing_page(&content, version)?;
    write_document(version_root, &doc).await?;
    Ok(())
}

/// Render one page per example into `<content_dir>/examples/`, replacing the
/// previous set.
#[instrument(skip_all, fields(examples_repo = %examples_repo.display()))]
pub async fn write_examples(examples_repo: &Path, content_dir: &Path) -> Result<usize> {
    let examples = collect_examples(examples_repo)?;

    let out_dir = content_dir.join(EXAMPLES_DIR);
    if out_dir.exists() {
        remove_path(&out_dir)?;
    }

    for (name, readme) in &examples {
        let content = read(readme).await?;
        let doc = docsite_markdown::transform_page(
            &format!("{name}/README.md"),
            &format!("{name}.md"),
            &content,
            VERSION_LATEST,
        )?;
        write_document(&out_dir, &doc).await?;
    }

    info!(count = examples.len(), "examples written");
    Ok(examples.len())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn convert_file(input: &Path, source: &str, root: &Path, version: &str) -> Result<String> {
    let content = read(input).await?;
    let doc = docsite_markdown::transform_document(source, &content, version)?;
    write_document(root, &doc).await?;
    Ok(doc.path)
}

async fn write_document(root: &Path, doc: &TransformedDocument) -> Result<PathBuf> {
    let path = root.join(&doc.path);
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| DocsiteError::io(parent, e))?;
    }
    tokio::fs::write(&path, doc.render())
        .await
        .map_err(|e| DocsiteError::io(&path, e))?;
    Ok(path)
}

async fn read(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| DocsiteError::io(path, e))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::SilentProgress;

    fn touch(path: &Path, content: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[tokio::test]
    async fn documents_are_converted_and_written() {
        let dir = tempfile::tempdir().unwrap();
        let docs = dir.path().join("docs");
        let out = dir.path().join("out/v0.54");
        touch(&docs.join("010_user-guide/README.md"), "# User Guide\n\nHello\n");
        touch(&docs.join("050_best-practices/README.md"), "# Best Practices\n\nDo\n");

        let sources = vec![
            "010_user-guide/README.md".to_string(),
            "050_best-practices/README.md".to_string(),
        ];
        let written = write_documents(&docs, &out, "v0.54.2", sources, &SilentProgress)
            .await
            .unwrap();

        assert_eq!(written, 2);
        let guide = std::fs::read_to_string(out.join("user-guide/index.md")).unwrap();
        assert!(guide.contains("title: \"Overview\""));
        assert!(guide.contains("slug: \"v0.54/user-guide\""));
        let bp = std::fs::read_to_string(out.join("reference/best-practices.md")).unwrap();
        assert!(bp.contains("title: \"Best Practices\""));
    }

    #[tokio::test]
    async fn failures_are_aggregated_after_all_tasks_finish() {
        let dir = tempfile::tempdir().unwrap();
        let docs = dir.path().join("docs");
        let out = dir.path().join("out");
        touch(&docs.join("good.md"), "# Good\n");
        touch(&docs.join("bad.md"), "no heading\n");

        let sources = vec![
            "bad.md".to_string(),
            "good.md".to_string(),
            "missing.md".to_string(),
        ];
        let err = write_documents(&docs, &out, "latest", sources, &SilentProgress)
            .await
            .unwrap_err();

        match err {
            DocsiteError::Aggregate { failures, .. } => {
                assert_eq!(failures.len(), 2);
                assert!(failures[0].starts_with("bad.md"));
                assert!(failures[1].starts_with("missing.md"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(out.join("good.md").is_file());
    }

    #[tokio::test]
    async fn community_pages_use_canonical_names() {
        let dir = tempfile::tempdir().unwrap();
        let core = dir.path().join("core");
        let out = dir.path().join("out");
        touch(&core.join("CODE-OF-CONDUCT.md"), "# Code of Conduct\n\nBe kind.\n");
        touch(&core.join("SUPPORT.md"), "# Support\n");

        let written = write_community_pages(&core, &out, "latest").await.unwrap();

        assert_eq!(written, 2);
        assert!(out.join("community/code-of-conduct.md").is_file());
        assert!(out.join("community/support.md").is_file());
        assert!(!out.join("community/security.md").exists());
    }

    #[tokio::test]
    async fn landing_page_from_root_readme() {
        let dir = tempfile::tempdir().unwrap();
        let core = dir.path().join("core");
        let out = dir.path().join("out");
        touch(&core.join("README.md"), "# Pepr\n\nRead the [docs](docs/README.md).\n");

        write_landing_page(&core, &out, "latest").await.unwrap();

        let index = std::fs::read_to_string(out.join("index.md")).unwrap();
        assert!(index.contains("title: \"Pepr\""));
        assert!(index.contains("[docs](./)"));
    }

    #[tokio::test]
    async fn examples_replace_previous_set() {
        let dir = tempfile::tempdir().unwrap();
        let examples = dir.path().join("examples-repo");
        let content = dir.path().join("content");
        touch(&examples.join("hello-pepr/README.md"), "# Hello Pepr\n\nDeploy it.\n");
        touch(&content.join("examples/removed.md"), "old");

        let count = write_examples(&examples, &content).await.unwrap();

        assert_eq!(count, 1);
        assert!(!content.join("examples/removed.md").exists());
        let page = std::fs::read_to_string(content.join("examples/hello-pepr.md")).unwrap();
        assert!(page.contains("title: \"Hello Pepr\""));
    }
}
