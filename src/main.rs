//! tripboard - A trip-planning board with streamed itinerary suggestions.
//!
//! This is the main binary. It loads the configuration, installs logging and
//! dispatches to a subcommand.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};
use tripboard_config::Config;

mod cli;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    fmt()
        .with_env_filter(log_filter(cli.verbose, config.log_filter.as_deref()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Plan(args) => cli::plan::execute(args, &config).await,
        Commands::Demo(args) => cli::demo::execute(args).await,
    }
}

/// Picks the log filter: `--verbose`, then `RUST_LOG`, then the config file.
fn log_filter(verbose: bool, configured: Option<&str>) -> EnvFilter {
    if verbose {
        return EnvFilter::new("tripboard=debug");
    }
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(configured.unwrap_or("tripboard=warn")))
}
