//! End-to-end site build: discover → versions → examples → flatten →
//! navigation → redirects → static build.

use std::time::{Duration, Instant};

use tracing::{info, instrument};

use docsite_redirects::RedirectCounts;
use docsite_shared::{Result, RunState, SiteConfig, VERSION_LATEST};
use docsite_versions::{discover_repo_versions, find_current_version, git, version_dir};

use crate::{content, layout, navigation, site, sources};

/// Summary of a finished build.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Versions converted in this run.
    pub versions_built: Vec<String>,
    /// Versions whose output directory already existed.
    pub versions_skipped: Vec<String>,
    /// Retired version directories deleted.
    pub retired_removed: usize,
    /// Pages written across all built versions.
    pub documents_written: usize,
    /// Example pages written.
    pub examples_written: usize,
    /// Navigation files written.
    pub navigation_files: usize,
    /// Redirect rules per section.
    pub redirects: RedirectCounts,
    /// Whether the static site build ran.
    pub site_built: bool,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Progress callback for reporting build status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new stage.
    fn stage(&self, name: &str);
    /// Called before a version is processed.
    fn version_started(&self, version: &str, current: usize, total: usize);
    /// Called when a page of the current version is written.
    fn document_written(&self, path: &str, current: usize, total: usize);
    /// Called when the build completes.
    fn done(&self, report: &BuildReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn stage(&self, _name: &str) {}
    fn version_started(&self, _version: &str, _current: usize, _total: usize) {}
    fn document_written(&self, _path: &str, _current: usize, _total: usize) {}
    fn done(&self, _report: &BuildReport) {}
}

enum VersionOutcome {
    Built { documents: usize },
    Skipped,
}

/// Run the full build.
///
/// Versions are processed one after another since each needs its own
/// checkout of the core repository. `state` records progress and is dumped
/// to stderr if a stage fails.
#[instrument(skip_all, fields(core = %config.core_repo.display(), site = %config.site_dir.display()))]
pub async fn build_site(
    config: &SiteConfig,
    state: &mut RunState,
    progress: &dyn ProgressReporter,
) -> Result<BuildReport> {
    let start = Instant::now();
    let mut report = BuildReport::default();

    info!(cutoff = config.cutoff, skip_build = config.skip_build, "starting site build");

    // --- Discovery ---
    run_stage("discover", state, progress, async |state: &mut RunState| {
        let set = discover_repo_versions(&config.core_repo, config.cutoff)?;
        state.current_version = find_current_version(&set.versions);
        state.versions = set.versions;
        state.retired = set.retired;
        Ok(())
    })
    .await?;

    report.retired_removed = run_stage("prune retired", state, progress, async |state: &mut RunState| {
        Ok(layout::prune_retired(&config.content_dir, &state.retired)?.len())
    })
    .await?;

    // --- Versions ---
    let versions = state.versions.clone();
    let total = versions.len();
    for (i, version) in versions.iter().enumerate() {
        progress.version_started(version, i + 1, total);

        let name = format!("version {version}");
        let outcome = run_stage(&name, state, progress, async |state: &mut RunState| {
            state.cursor = Some(version.clone());
            build_version(config, version, progress).await
        })
        .await?;

        match outcome {
            VersionOutcome::Built { documents } => {
                report.documents_written += documents;
                report.versions_built.push(version.clone());
            }
            VersionOutcome::Skipped => report.versions_skipped.push(version.clone()),
        }
    }
    state.cursor = None;

    // --- Site-wide outputs ---
    report.examples_written = run_stage("examples", state, progress, async |_: &mut RunState| {
        content::write_examples(&config.examples_repo, &config.content_dir).await
    })
    .await?;

    run_stage("flatten latest", state, progress, async |_: &mut RunState| {
        layout::flatten_latest(&config.content_dir).map(|_| ())
    })
    .await?;

    report.navigation_files = run_stage("navigation", state, progress, async |state: &mut RunState| {
        let written =
            navigation::write_navigation(&config.content_dir, &config.versions_dir, &state.versions)?;
        Ok(written.len())
    })
    .await?;

    report.redirects = run_stage("redirects", state, progress, async |state: &mut RunState| {
        docsite_redirects::generate_redirects(
            &config.core_repo,
            &state.retired,
            &state.versions,
            &config.redirects_file,
        )
    })
    .await?;

    // --- Static build ---
    if config.skip_build {
        info!("skipping static site build");
    } else {
        run_stage("site build", state, progress, async |_: &mut RunState| {
            site::build_and_publish(config)
        })
        .await?;
        report.site_built = true;
    }

    report.elapsed = start.elapsed();
    progress.done(&report);

    info!(
        built = report.versions_built.len(),
        skipped = report.versions_skipped.len(),
        documents = report.documents_written,
        redirects = report.redirects.total,
        elapsed_ms = report.elapsed.as_millis(),
        "site build complete"
    );

    Ok(report)
}

/// Run one stage, logging its name and duration.
///
/// On failure the error and a JSON dump of `state` are printed to stderr
/// before the error is returned.
pub async fn run_stage<T>(
    name: &str,
    state: &mut RunState,
    progress: &dyn ProgressReporter,
    stage: impl AsyncFnOnce(&mut RunState) -> Result<T>,
) -> Result<T> {
    let start = Instant::now();
    state.stage = Some(name.to_string());
    progress.stage(name);
    info!(stage = name, "stage started");

    match stage(state).await {
        Ok(value) => {
            info!(stage = name, elapsed_ms = start.elapsed().as_millis(), "stage finished");
            Ok(value)
        }
        Err(e) => {
            eprintln!();
            eprintln!("{e}");
            eprintln!();
            eprintln!("State dump:");
            eprintln!("{}", state.dump());
            Err(e)
        }
    }
}

// ---------------------------------------------------------------------------
// Per-version build
// ---------------------------------------------------------------------------

async fn build_version(
    config: &SiteConfig,
    version: &str,
    progress: &dyn ProgressReporter,
) -> Result<VersionOutcome> {
    let version_root = config.content_dir.join(version_dir(version));
    let is_latest = version == VERSION_LATEST;

    if version_root.exists() {
        if !is_latest {
            info!(%version, path = %version_root.display(), "already built, skipping");
            return Ok(VersionOutcome::Skipped);
        }
        layout::remove_path(&version_root)?;
    }

    let reference = if is_latest {
        config.default_branch.as_str()
    } else {
        version
    };
    git::checkout(&config.core_repo, reference)?;
    let head = git::describe(&config.core_repo)?;
    info!(%version, %head, "checked out core repository");

    let docs_dir = config.core_repo.join(sources::DOCS_DIR);
    let doc_sources = sources::collect_doc_sources(&docs_dir)?;
    sources::copy_images(&docs_dir, &config.assets_dir)?;

    let community =
        content::write_community_pages(&config.core_repo, &version_root, version).await?;
    let documents =
        content::write_documents(&docs_dir, &version_root, version, doc_sources, progress).await?;
    content::write_landing_page(&config.core_repo, &version_root, version).await?;

    Ok(VersionOutcome::Built {
        documents: documents + community + 1,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::process::Command;

    use docsite_shared::{AppConfig, DocsiteError, RepoPaths};

    use super::*;

    fn touch(path: &Path, content: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn git(repo: &Path, args: &[&str]) {
        let status = Command::new("git")
            .args([
                "-c",
                "user.name=Docs Bot",
                "-c",
                "user.email=docs@example.com",
                "-c",
                "commit.gpgsign=false",
                "-c",
                "tag.gpgsign=false",
            ])
            .arg("-C")
            .arg(repo)
            .args(args)
            .status()
            .unwrap();
        assert!(status.success(), "git {args:?} failed");
    }

    fn commit_and_tag(repo: &Path, message: &str, tag: Option<&str>) {
        git(repo, &["add", "-A"]);
        git(repo, &["commit", "-q", "-m", message]);
        if let Some(tag) = tag {
            git(repo, &["tag", tag]);
        }
    }

    fn core_fixture(core: &Path) {
        std::fs::create_dir_all(core).unwrap();
        git(core, &["init", "-q", "-b", "main"]);

        touch(&core.join("README.md"), "# Pepr\n\nStart with the [docs](docs/README.md).\n");
        touch(&core.join("CODE_OF_CONDUCT.md"), "# Code of Conduct\n\nBe kind.\n");
        touch(&core.join("docs/README.md"), "# Docs\n");
        touch(&core.join("docs/_images/arch.png"), "png");
        touch(
            &core.join("docs/010_user-guide/README.md"),
            "# User Guide\n\nSee the [CLI](./020_cli.md).\n",
        );
        touch(&core.join("docs/010_user-guide/020_cli.md"), "# CLI\n\nv1\n");
        commit_and_tag(core, "v0.1.0", Some("v0.1.0"));

        touch(&core.join("docs/010_user-guide/020_cli.md"), "# CLI\n\nv2\n");
        commit_and_tag(core, "v0.2.0", Some("v0.2.0"));
        touch(&core.join("docs/010_user-guide/020_cli.md"), "# CLI\n\nv2.1\n");
        commit_and_tag(core, "v0.2.1", Some("v0.2.1"));

        touch(&core.join("docs/010_user-guide/030_new.md"), "# New\n\nUnreleased.\n");
        commit_and_tag(core, "unreleased", None);
    }

    fn test_state() -> RunState {
        RunState {
            started_at: chrono::Utc::now(),
            core_repo: "/tmp/core".into(),
            site_dir: "/tmp/site".into(),
            examples_repo: "/tmp/examples".into(),
            content_dir: "/tmp/site/src/content/docs".into(),
            versions: vec!["latest".into()],
            retired: Vec::new(),
            current_version: None,
            cursor: None,
            stage: None,
        }
    }

    #[tokio::test]
    async fn run_stage_records_stage_and_propagates_errors() {
        let mut state = test_state();

        let value = run_stage("ok", &mut state, &SilentProgress, async |_: &mut RunState| Ok(7))
            .await
            .unwrap();
        assert_eq!(value, 7);
        assert_eq!(state.stage.as_deref(), Some("ok"));

        let err = run_stage("boom", &mut state, &SilentProgress, async |state: &mut RunState| {
            state.cursor = Some("v0.54.2".into());
            Err::<(), _>(DocsiteError::validation("boom"))
        })
        .await
        .unwrap_err();

        assert!(matches!(err, DocsiteError::Validation { .. }));
        assert_eq!(state.stage.as_deref(), Some("boom"));
        assert_eq!(state.cursor.as_deref(), Some("v0.54.2"));
    }

    #[tokio::test]
    async fn builds_full_site_then_reuses_archived_versions() {
        let tmp = tempfile::tempdir().unwrap();
        let core = tmp.path().join("core");
        let examples = tmp.path().join("examples");
        let site_dir = tmp.path().join("site");

        core_fixture(&core);
        touch(&examples.join("hello-pepr/README.md"), "# Hello Pepr\n\nDeploy it.\n");
        touch(&site_dir.join("src/content/docs/v0.1/index.md"), "retired");
        touch(&site_dir.join("src/content/docs/stale.md"), "stale");

        let config = SiteConfig::resolve(
            &AppConfig::default(),
            RepoPaths {
                core_repo: core.clone(),
                site_dir: site_dir.clone(),
                examples_repo: examples.clone(),
            },
            Some(1),
            true,
        )
        .unwrap();

        let mut state = RunState::new(&config);
        let report = build_site(&config, &mut state, &SilentProgress).await.unwrap();

        assert_eq!(report.versions_built, vec!["v0.2.1", "latest"]);
        assert!(report.versions_skipped.is_empty());
        assert_eq!(report.retired_removed, 1);
        assert_eq!(state.retired, vec!["0.1"]);
        assert_eq!(state.current_version.as_deref(), Some("v0.2.1"));
        assert!(!report.site_built);

        let docs = &config.content_dir;
        assert!(!docs.join("v0.1").exists());
        assert!(!docs.join("latest").exists());
        assert!(!docs.join("stale.md").exists());

        let index = std::fs::read_to_string(docs.join("index.md")).unwrap();
        assert!(index.contains("title: \"Pepr\""));
        assert!(docs.join("user-guide/new.md").is_file());
        assert!(docs.join("community/code-of-conduct.md").is_file());
        assert!(docs.join("examples/hello-pepr.md").is_file());

        let archived = std::fs::read_to_string(docs.join("v0.2/user-guide/cli.md")).unwrap();
        assert!(archived.contains("slug: \"v0.2/user-guide/cli\""));
        assert!(archived.contains("v2.1"));
        assert!(!docs.join("v0.2/user-guide/new.md").exists());

        let guide = std::fs::read_to_string(docs.join("user-guide/index.md")).unwrap();
        assert!(guide.contains("[CLI](./cli)"));

        assert!(config.assets_dir.join("arch.png").is_file());
        assert!(config.versions_dir.join("v0.2.json").is_file());

        let redirects = std::fs::read_to_string(&config.redirects_file).unwrap();
        assert!(redirects.contains("/v0.1/*"));
        assert!(redirects.contains("/v0.1.0/*"));
        assert_eq!(report.redirects.retired, 2);
        assert_eq!(report.redirects.patch, 2);
        assert_eq!(report.redirects.examples, 1);

        let mut state = RunState::new(&config);
        let again = build_site(&config, &mut state, &SilentProgress).await.unwrap();
        assert_eq!(again.versions_built, vec!["latest"]);
        assert_eq!(again.versions_skipped, vec!["v0.2.1"]);
        assert!(docs.join("index.md").is_file());
        assert!(docs.join("v0.2/user-guide/cli.md").is_file());
    }
}
