//! Analyze command implementation.

use anyhow::{bail, Context, Result};
use chrono::{Days, Local, NaiveDate};
use insight_config::{AppConfig, YEARS_RANGE};
use insight_core::InsightError;
use insight_data::{Acquisition, CsvPriceSource, EastmoneySource, SourceKind, SyntheticSource};
use insight_indicators::compute_indicators;
use insight_monitor::Dashboard;
use insight_report::{AnalysisReport, XlsxWriter};
use insight_signals::SignalClassifier;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::cli::{AnalyzeArgs, OutputFormat};

pub async fn run(args: AnalyzeArgs, config: &AppConfig) -> Result<()> {
    let report = build_report(&args, config).await?;

    match args.format {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Text => println!("{}", report.summary()),
    }

    if let Some(requested) = &args.export {
        let path = resolve_export_path(
            requested,
            config.report.output_dir.as_deref(),
            &report.default_file_name(),
        );
        XlsxWriter::new(config.report.price_rows)
            .write(&report, &path)
            .with_context(|| format!("Failed to export report to {}", path.display()))?;
        println!("Report exported to {}", path.display());
    }

    if args.dashboard {
        Dashboard::new(&report)
            .run()
            .context("Dashboard terminated with an error")?;
    }

    Ok(())
}

/// Acquire data and assemble the report for one ticker.
pub async fn build_report(args: &AnalyzeArgs, config: &AppConfig) -> Result<AnalysisReport> {
    config.validate()?;
    let ticker = validate_ticker(&args.ticker)?;
    let years = args.years.unwrap_or(config.data.years);
    validate_years(years)?;

    let source = args.source.unwrap_or(config.data.source);
    let fallback = config.data.fallback && !args.no_fallback;
    let end = Local::now().date_naive();
    let start = lookback_start(end, years);
    info!(ticker, %source, years, fallback, "Starting analysis");

    let acquisition = build_acquisition(source, args.data.as_deref(), config, fallback)?;
    let (prices, metrics) = acquisition
        .fetch(ticker, start, end)
        .await
        .with_context(|| format!("Failed to acquire data for {}", ticker))?;

    let indicators = compute_indicators(&prices);
    let signals = SignalClassifier::new(config.signals).classify_latest(&indicators);
    let report = AnalysisReport::new(prices, indicators, metrics, signals);

    info!(
        ticker,
        bars = report.prices.len(),
        synthetic = report.synthetic_prices,
        signals = %report.signal_text(),
        "Analysis complete"
    );
    Ok(report)
}

fn build_acquisition(
    source: SourceKind,
    data: Option<&Path>,
    config: &AppConfig,
    fallback: bool,
) -> Result<Acquisition> {
    let acquisition = match source {
        SourceKind::Eastmoney => {
            let endpoints = config.data.eastmoney_config();
            Acquisition::new(
                Box::new(EastmoneySource::new(endpoints.clone())?),
                Some(Box::new(EastmoneySource::new(endpoints)?)),
            )
        }
        SourceKind::Csv => {
            let path = match (data, config.data.csv_dir.as_deref()) {
                (Some(path), _) => path.to_path_buf(),
                (None, Some(dir)) => PathBuf::from(dir),
                (None, None) => bail!(
                    "The csv source needs a file or directory: pass --data or set data.csv_dir"
                ),
            };
            Acquisition::new(Box::new(CsvPriceSource::new(path)?), None)
        }
        SourceKind::Synthetic => {
            let synthetic = SyntheticSource::new(config.data.synthetic_days);
            Acquisition::new(Box::new(synthetic.clone()), Some(Box::new(synthetic)))
        }
    };

    Ok(if fallback {
        acquisition.with_fallback(SyntheticSource::new(config.data.synthetic_days))
    } else {
        acquisition
    })
}

fn validate_ticker(ticker: &str) -> Result<&str, InsightError> {
    let ticker = ticker.trim();
    if ticker.is_empty() {
        return Err(InsightError::Validation("please enter a ticker symbol".into()));
    }
    Ok(ticker)
}

fn validate_years(years: u32) -> Result<(), InsightError> {
    if !YEARS_RANGE.contains(&years) {
        return Err(InsightError::Validation(format!(
            "years must be between {} and {}, got {}",
            YEARS_RANGE.start(),
            YEARS_RANGE.end(),
            years
        )));
    }
    Ok(())
}

/// First date of a lookback of `years` 365-day years ending at `end`.
fn lookback_start(end: NaiveDate, years: u32) -> NaiveDate {
    end.checked_sub_days(Days::new(365 * u64::from(years)))
        .unwrap_or(NaiveDate::MIN)
}

/// Directories get the default file name; relative files land in the
/// configured output directory.
fn resolve_export_path(requested: &Path, output_dir: Option<&str>, default_name: &str) -> PathBuf {
    if requested.is_dir() {
        return requested.join(default_name);
    }
    match output_dir {
        Some(dir) if requested.is_relative() => Path::new(dir).join(requested),
        _ => requested.to_path_buf(),
    }
}
