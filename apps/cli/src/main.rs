//! docsite CLI: builds the versioned documentation site.
//!
//! Converts the core repository's Markdown docs for every supported release,
//! writes redirects and navigation, then runs the static site build.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
