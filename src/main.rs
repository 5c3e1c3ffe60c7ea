//! bioagents-ape CLI entry point
//!
//! - `bioagents-ape fetch` - fetch and convert a domain's agents
//! - `bioagents-ape convert` - convert a raw dump
//! - `bioagents-ape evaluate` / `evaluate-all` - annotation depth reports
//! - `bioagents-ape config` - show or validate configuration

use bioagents_ape::cli::{commands, Cli};
use bioagents_ape::Result;
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse_args();
    let config = commands::load_config(cli.config.as_deref())?;

    init_tracing(&config.log_level, cli.verbose, cli.no_color);

    commands::run(cli, config).await
}

fn init_tracing(default_level: &str, verbose: bool, no_color: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .with_target(false)
        .try_init();
}
