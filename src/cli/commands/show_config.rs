//! Show configuration command.

use anyhow::{Context, Result};
use insight_config::AppConfig;

pub async fn run(config: &AppConfig) -> Result<()> {
    let text = toml::to_string_pretty(config).context("Failed to serialize configuration")?;
    println!("{}", text);
    Ok(())
}
