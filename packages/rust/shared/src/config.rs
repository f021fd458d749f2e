//! Application configuration for docsite.
//!
//! The site repository may carry a `docsite.toml` at its root.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DocsiteError, Result};

/// Default configuration file name, looked up in the site directory.
pub const CONFIG_FILE_NAME: &str = "docsite.toml";

// ---------------------------------------------------------------------------
// Config structs (matching docsite.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version selection.
    #[serde(default)]
    pub versions: VersionsConfig,

    /// Output layout inside the site directory.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Static-site build invocation.
    #[serde(default)]
    pub build: BuildConfig,
}

/// `[versions]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionsConfig {
    /// Number of most recent `major.minor` lines kept online.
    #[serde(default = "default_cutoff")]
    pub cutoff: usize,

    /// Branch checked out to build the `latest` version.
    #[serde(default = "default_branch")]
    pub default_branch: String,
}

impl Default for VersionsConfig {
    fn default() -> Self {
        Self {
            cutoff: default_cutoff(),
            default_branch: default_branch(),
        }
    }
}

fn default_cutoff() -> usize {
    2
}
fn default_branch() -> String {
    "main".into()
}

/// `[paths]` section. All paths are relative to the site directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Root of the generated Markdown tree.
    #[serde(default = "default_content_dir")]
    pub content_dir: String,

    /// Where images and other static assets are copied.
    #[serde(default = "default_assets_dir")]
    pub assets_dir: String,

    /// Where per-version navigation JSON files are written.
    #[serde(default = "default_versions_dir")]
    pub versions_dir: String,

    /// Redirect rules file consumed by the hosting platform.
    #[serde(default = "default_redirects_file")]
    pub redirects_file: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            content_dir: default_content_dir(),
            assets_dir: default_assets_dir(),
            versions_dir: default_versions_dir(),
            redirects_file: default_redirects_file(),
        }
    }
}

fn default_content_dir() -> String {
    "src/content/docs".into()
}
fn default_assets_dir() -> String {
    "public/assets".into()
}
fn default_versions_dir() -> String {
    "src/content/versions".into()
}
fn default_redirects_file() -> String {
    "public/_redirects".into()
}

/// `[build]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Program and arguments run inside the site directory.
    #[serde(default = "default_build_command")]
    pub command: Vec<String>,

    /// Directory the builder writes, relative to the site directory.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Final location of the built site, relative to the working directory.
    #[serde(default = "default_publish_dir")]
    pub publish_dir: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            command: default_build_command(),
            output_dir: default_output_dir(),
            publish_dir: default_publish_dir(),
        }
    }
}

fn default_build_command() -> Vec<String> {
    vec!["npm".into(), "run".into(), "build".into()]
}
fn default_output_dir() -> String {
    "dist".into()
}
fn default_publish_dir() -> String {
    "dist".into()
}

// ---------------------------------------------------------------------------
// Site config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime configuration for one build, with every path resolved.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Checkout of the core repository (source of the docs).
    pub core_repo: PathBuf,
    /// Root of the static site project.
    pub site_dir: PathBuf,
    /// Checkout of the examples repository.
    pub examples_repo: PathBuf,
    /// Skip the final static-site build.
    pub skip_build: bool,
    /// Number of ongoing `major.minor` lines.
    pub cutoff: usize,
    /// Branch used for `latest`.
    pub default_branch: String,
    /// Absolute content directory.
    pub content_dir: PathBuf,
    /// Absolute assets directory.
    pub assets_dir: PathBuf,
    /// Absolute navigation config directory.
    pub versions_dir: PathBuf,
    /// Absolute redirects file path.
    pub redirects_file: PathBuf,
    /// Build command (program first).
    pub build_command: Vec<String>,
    /// Absolute builder output directory.
    pub build_output_dir: PathBuf,
    /// Publish directory for the built site.
    pub publish_dir: PathBuf,
}

/// Directories passed on the command line.
#[derive(Debug, Clone)]
pub struct RepoPaths {
    pub core_repo: PathBuf,
    pub site_dir: PathBuf,
    pub examples_repo: PathBuf,
}

impl SiteConfig {
    /// Merge the file config with the CLI-provided repository paths.
    ///
    /// Every repository path must be an existing directory.
    pub fn resolve(
        config: &AppConfig,
        repos: RepoPaths,
        cutoff: Option<usize>,
        skip_build: bool,
    ) -> Result<Self> {
        for (flag, path) in [
            ("--core", &repos.core_repo),
            ("--site", &repos.site_dir),
            ("--examples", &repos.examples_repo),
        ] {
            if !path.is_dir() {
                return Err(DocsiteError::validation(format!(
                    "{flag} {} is not a directory",
                    path.display()
                )));
            }
        }

        let cutoff = cutoff.unwrap_or(config.versions.cutoff);
        if cutoff == 0 {
            return Err(DocsiteError::config("cutoff must be at least 1"));
        }
        if config.build.command.is_empty() {
            return Err(DocsiteError::config("build.command must not be empty"));
        }

        let site = &repos.site_dir;
        Ok(Self {
            skip_build,
            cutoff,
            default_branch: config.versions.default_branch.clone(),
            content_dir: site.join(&config.paths.content_dir),
            assets_dir: site.join(&config.paths.assets_dir),
            versions_dir: site.join(&config.paths.versions_dir),
            redirects_file: site.join(&config.paths.redirects_file),
            build_command: config.build.command.clone(),
            build_output_dir: site.join(&config.build.output_dir),
            publish_dir: PathBuf::from(&config.build.publish_dir),
            core_repo: repos.core_repo,
            site_dir: repos.site_dir,
            examples_repo: repos.examples_repo,
        })
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load `docsite.toml` from the site directory. Returns defaults if absent.
pub fn load_config(site_dir: &Path) -> Result<AppConfig> {
    let path = site_dir.join(CONFIG_FILE_NAME);

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| DocsiteError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| DocsiteError::config(format!("failed to parse {}: {e}", path.display())))
}
