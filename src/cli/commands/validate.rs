//! Validate configuration command.

use anyhow::Result;
use insight_config::{AppConfig, ConfigError};
use std::path::Path;

pub async fn run(config_path: Option<&Path>, loaded: Result<AppConfig, ConfigError>) -> Result<()> {
    match config_path {
        Some(path) => println!("Validating configuration: {:?}", path),
        None => println!("No configuration file, validating defaults and environment"),
    }

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    };
    if let Err(e) = config.validate() {
        println!("Configuration error: {}", e);
        return Err(e.into());
    }

    println!("Configuration is valid!");
    println!();
    println!("App: {}", config.app.name);
    println!("Log level: {}", config.logging.level);
    println!("Data source: {}", config.data.source);
    println!("Synthetic fallback: {}", config.data.fallback);
    println!("History: {} year(s)", config.data.years);
    println!(
        "Signal thresholds: oversold < {}, overbought > {}",
        config.signals.oversold, config.signals.overbought
    );

    Ok(())
}
