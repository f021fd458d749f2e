//! Static site build.

use std::path::Path;
use std::process::{Command, Stdio};

use tracing::{info, instrument};

use docsite_shared::{DocsiteError, Result, SiteConfig};

use crate::layout::remove_path;

/// Run the configured build command in the site directory, then move its
/// output directory to the publish directory.
#[instrument(skip_all, fields(site_dir = %config.site_dir.display()))]
pub fn build_and_publish(config: &SiteConfig) -> Result<()> {
    run_build_command(&config.build_command, &config.site_dir)?;
    publish(&config.build_output_dir, &config.publish_dir)
}

/// Run `command` in `dir`, inheriting stdout and stderr.
pub fn run_build_command(command: &[String], dir: &Path) -> Result<()> {
    let Some((program, args)) = command.split_first() else {
        return Err(DocsiteError::config("build command is empty"));
    };

    info!(command = %command.join(" "), "running site build");

    let status = Command::new(program)
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| DocsiteError::Command {
            program: program.clone(),
            args: args.join(" "),
            code: None,
            stderr: e.to_string(),
        })?;

    if !status.success() {
        return Err(DocsiteError::Command {
            program: program.clone(),
            args: args.join(" "),
            code: status.code(),
            stderr: "see build output above".to_string(),
        });
    }
    Ok(())
}

/// Move the build output to `publish_dir`, replacing what was there.
///
/// Nothing is moved when both paths are the same directory.
pub fn publish(output_dir: &Path, publish_dir: &Path) -> Result<()> {
    if !output_dir.is_dir() {
        return Err(DocsiteError::validation(format!(
            "build output not found: {}",
            output_dir.display()
        )));
    }

    if same_dir(output_dir, publish_dir) {
        info!(path = %publish_dir.display(), "build output already in place");
        return Ok(());
    }

    if publish_dir.exists() {
        remove_path(publish_dir)?;
    }
    if let Some(parent) = publish_dir.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| DocsiteError::io(parent, e))?;
        }
    }

    std::fs::rename(output_dir, publish_dir).map_err(|e| DocsiteError::io(publish_dir, e))?;
    info!(from = %output_dir.display(), to = %publish_dir.display(), "published site");
    Ok(())
}

fn same_dir(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
