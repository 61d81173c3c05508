//! Configuration management.

mod settings;

pub use settings::{
    AppConfig, AppSettings, DataSettings, LoggingConfig, ReportSettings, YEARS_RANGE,
};

pub use config::ConfigError;

use config::{Config, Environment, File};
use std::path::{Path, PathBuf};

/// Configuration file used when none is given explicitly.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Pick the configuration file: the explicit one, else the default file if
/// it exists, else none (built-in defaults plus environment).
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_PATH);
            default.exists().then_some(default)
        }
    }
}

/// Load configuration from file and environment.
///
/// A given file must exist. `INSIGHT__SECTION__KEY` variables override it.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(File::from(path).required(true));
    }
    let config = builder
        .add_source(
            Environment::with_prefix("INSIGHT")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    config.try_deserialize()
}
