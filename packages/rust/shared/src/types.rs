//! Core domain types shared across docsite crates.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::SiteConfig;

/// Sentinel version built from the default branch.
pub const VERSION_LATEST: &str = "latest";

/// Branch name that is never treated as a release.
pub const VERSION_MAIN: &str = "main";

// ---------------------------------------------------------------------------
// RunState
// ---------------------------------------------------------------------------

/// Mutable record of one build invocation.
///
/// Owned by the orchestrator and handed to each stage by reference. It is
/// printed as JSON when a stage fails so a broken CI run can be diagnosed
/// from its log alone.
#[derive(Debug, Clone, Serialize)]
pub struct RunState {
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Core repository checkout.
    pub core_repo: PathBuf,
    /// Site project directory.
    pub site_dir: PathBuf,
    /// Examples repository checkout.
    pub examples_repo: PathBuf,
    /// Generated content root.
    pub content_dir: PathBuf,
    /// Active versions (latest patch per ongoing line, then `latest`).
    pub versions: Vec<String>,
    /// Retired `major.minor` lines.
    pub retired: Vec<String>,
    /// Highest stable release among the active versions.
    pub current_version: Option<String>,
    /// Version currently being processed.
    pub cursor: Option<String>,
    /// Stage currently running.
    pub stage: Option<String>,
}

impl RunState {
    /// Fresh state for a run driven by `config`.
    pub fn new(config: &SiteConfig) -> Self {
        Self {
            started_at: Utc::now(),
            core_repo: config.core_repo.clone(),
            site_dir: config.site_dir.clone(),
            examples_repo: config.examples_repo.clone(),
            content_dir: config.content_dir.clone(),
            versions: Vec::new(),
            retired: Vec::new(),
            current_version: None,
            cursor: None,
            stage: None,
        }
    }

    /// Pretty JSON snapshot for failure output.
    pub fn dump(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| format!("{self:#?}"))
    }
}
