//! CLI definition, tracing setup and the build command.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use docsite_core::{BuildReport, ProgressReporter, build_site};
use docsite_shared::{RepoPaths, RunState, SiteConfig, load_config, load_config_from};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// docsite: build the versioned documentation site.
#[derive(Parser)]
#[command(
    name = "docsite",
    version,
    about = "Build the versioned documentation site from the core and examples repositories.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Checkout of the core repository.
    #[arg(long, env = "DOCSITE_CORE")]
    pub core: PathBuf,

    /// Static site project directory.
    #[arg(long, env = "DOCSITE_SITE")]
    pub site: PathBuf,

    /// Checkout of the examples repository.
    #[arg(long, env = "DOCSITE_EXAMPLES")]
    pub examples: PathBuf,

    /// Generate content only; do not run the static site build.
    #[arg(long)]
    pub skip_build: bool,

    /// Config file (defaults to <site>/docsite.toml when present).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of release lines kept online (overrides the config file).
    #[arg(long)]
    pub cutoff: Option<usize>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "docsite=info",
        1 => "docsite=debug",
        _ => "docsite=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Build command
// ---------------------------------------------------------------------------

/// Resolve configuration and run the site build.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let app_config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config(&cli.site)?,
    };

    let config = SiteConfig::resolve(
        &app_config,
        RepoPaths {
            core_repo: cli.core,
            site_dir: cli.site,
            examples_repo: cli.examples,
        },
        cli.cutoff,
        cli.skip_build,
    )?;

    info!(
        core = %config.core_repo.display(),
        site = %config.site_dir.display(),
        examples = %config.examples_repo.display(),
        "configuration resolved"
    );

    let mut state = RunState::new(&config);
    let progress = CliProgress::new();
    let report = build_site(&config, &mut state, &progress).await;
    progress.clear();
    let report = report.wrap_err("site build failed")?;

    print_summary(&report);
    Ok(())
}

fn print_summary(report: &BuildReport) {
    println!();
    println!("  Site build complete!");
    println!("  Built:      {}", list_or_none(&report.versions_built));
    println!("  Skipped:    {}", list_or_none(&report.versions_skipped));
    println!("  Retired:    {} removed", report.retired_removed);
    println!("  Documents:  {}", report.documents_written);
    println!("  Examples:   {}", report.examples_written);
    println!("  Navigation: {} files", report.navigation_files);
    println!(
        "  Redirects:  {} (retired {}, manual {}, patch {}, examples {})",
        report.redirects.total,
        report.redirects.retired,
        report.redirects.manual,
        report.redirects.patch,
        report.redirects.examples
    );
    println!(
        "  Site:       {}",
        if report.site_built { "built" } else { "skipped" }
    );
    println!("  Time:       {:.1}s", report.elapsed.as_secs_f64());
    println!();
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

// ---------------------------------------------------------------------------
// Progress reporting
// ---------------------------------------------------------------------------

/// Spinner-based progress reporter for the terminal.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(Duration::from_millis(80));
        Self { spinner }
    }

    fn clear(&self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}

impl ProgressReporter for CliProgress {
    fn stage(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn version_started(&self, version: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Version [{current}/{total}] {version}"));
    }

    fn document_written(&self, path: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Converting [{current}/{total}] {path}"));
    }

    fn done(&self, _report: &BuildReport) {
        self.spinner.finish_and_clear();
    }
}
