//! Configuration structures.

use insight_core::error::InsightError;
use insight_data::{EastmoneyConfig, SourceKind, DEFAULT_KLINE_URL, DEFAULT_QUOTE_URL};
use insight_signals::SignalThresholds;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Years of history a run may request.
pub const YEARS_RANGE: std::ops::RangeInclusive<u32> = 1..=5;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub signals: SignalThresholds,
    #[serde(default)]
    pub report: ReportSettings,
}

impl AppConfig {
    /// Check value ranges.
    pub fn validate(&self) -> Result<(), InsightError> {
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(InsightError::Config(format!(
                "Unknown log format '{}', expected pretty or json",
                self.logging.format
            )));
        }
        if !YEARS_RANGE.contains(&self.data.years) {
            return Err(InsightError::Config(format!(
                "data.years must be between {} and {}",
                YEARS_RANGE.start(),
                YEARS_RANGE.end()
            )));
        }
        if self.data.timeout_secs == 0 {
            return Err(InsightError::Config("data.timeout_secs must be positive".into()));
        }
        if self.data.synthetic_days == 0 {
            return Err(InsightError::Config("data.synthetic_days must be positive".into()));
        }
        if self.data.base_url.trim().is_empty() || self.data.quote_url.trim().is_empty() {
            return Err(InsightError::Config("data URLs must not be empty".into()));
        }
        if self.report.price_rows == 0 {
            return Err(InsightError::Config("report.price_rows must be positive".into()));
        }
        self.signals.validate()
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub name: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "stock-insight".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub file: Option<String>,
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format == "json"
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

/// Data acquisition settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub source: SourceKind,
    /// Daily kline endpoint
    pub base_url: String,
    /// Quote (valuation) endpoint
    pub quote_url: String,
    /// CSV file or directory for the csv source
    pub csv_dir: Option<String>,
    pub timeout_secs: u64,
    /// Bars generated when falling back to synthetic prices
    pub synthetic_days: usize,
    /// Substitute synthetic data when the source fails
    pub fallback: bool,
    /// Default lookback in years
    pub years: u32,
}

impl DataSettings {
    pub fn eastmoney_config(&self) -> EastmoneyConfig {
        EastmoneyConfig {
            kline_url: self.base_url.clone(),
            quote_url: self.quote_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            source: SourceKind::default(),
            base_url: DEFAULT_KLINE_URL.to_string(),
            quote_url: DEFAULT_QUOTE_URL.to_string(),
            csv_dir: None,
            timeout_secs: 10,
            synthetic_days: 250,
            fallback: true,
            years: 1,
        }
    }
}

/// Report export settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Trailing price rows written to the Price sheet
    pub price_rows: usize,
    /// Directory for exported workbooks
    pub output_dir: Option<String>,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            price_rows: 250,
            output_dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.data.source, SourceKind::Eastmoney);
        assert_eq!(config.data.years, 1);
        assert_eq!(config.report.price_rows, 250);
    }

    #[test]
    fn test_validate_ranges() {
        let mut config = AppConfig::default();
        config.data.years = 6;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.logging.format = "xml".into();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.signals.oversold = 90.0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.report.price_rows = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = AppConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        assert!(text.contains("[data]"));
        assert!(text.contains("source = \"eastmoney\""));

        let parsed: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.data.base_url, config.data.base_url);
    }

    #[test]
    fn test_eastmoney_config() {
        let mut data = DataSettings::default();
        data.timeout_secs = 3;
        assert_eq!(data.eastmoney_config().timeout, Duration::from_secs(3));
    }
}
