//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use insight_data::SourceKind;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "insight")]
#[command(author, version, about = "Single-stock analysis with MACD and KDJ indicators")]
pub struct Cli {
    /// Configuration file path (defaults to config/default.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level, overriding the configured one
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze one ticker
    Analyze(AnalyzeArgs),
    /// Print the effective configuration
    ShowConfig,
    /// Validate configuration
    ValidateConfig,
}

#[derive(clap::Args)]
pub struct AnalyzeArgs {
    /// Ticker symbol, e.g. 600519 or AAPL
    pub ticker: String,

    /// Years of history (1-5)
    #[arg(short, long)]
    pub years: Option<u32>,

    /// Data source (eastmoney, csv, synthetic)
    #[arg(short, long)]
    pub source: Option<SourceKind>,

    /// CSV file or directory for the csv source
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Export the report as an XLSX workbook (file or directory)
    #[arg(short, long)]
    pub export: Option<PathBuf>,

    /// Open the interactive dashboard after the report
    #[arg(long)]
    pub dashboard: bool,

    /// Fail instead of substituting synthetic data
    #[arg(long)]
    pub no_fallback: bool,
}
