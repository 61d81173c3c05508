//! Stock insight CLI application.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use insight_config::{load_config, resolve_config_path};
use insight_monitor::setup_logging;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = resolve_config_path(cli.config.as_deref());
    let loaded = load_config(config_path.as_deref());

    // Setup logging
    let logging = loaded
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_default();
    let log_level = cli
        .log_level
        .map_or(logging.level.as_str(), |level| level.as_str());
    let _log_guard = setup_logging(
        log_level,
        cli.json_logs || logging.is_json(),
        logging.file.as_deref().map(Path::new),
    );

    // Execute command
    match cli.command {
        Commands::Analyze(args) => {
            let config = loaded.context("Failed to load configuration")?;
            cli::commands::analyze::run(args, &config).await
        }
        Commands::ShowConfig => {
            let config = loaded.context("Failed to load configuration")?;
            cli::commands::show_config::run(&config).await
        }
        Commands::ValidateConfig => {
            cli::commands::validate::run(config_path.as_deref(), loaded).await
        }
    }
}
