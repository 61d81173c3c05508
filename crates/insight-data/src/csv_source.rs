//! CSV data source.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use insight_core::error::DataError;
use insight_core::traits::PriceSource;
use insight_core::types::{PriceBar, PriceSeries};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// CSV record format. Unparseable or empty prices load as missing.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "date", alias = "timestamp", alias = "Timestamp")]
    date: String,
    #[serde(alias = "High", alias = "high", deserialize_with = "csv::invalid_option", default)]
    high: Option<f64>,
    #[serde(alias = "Low", alias = "low", deserialize_with = "csv::invalid_option", default)]
    low: Option<f64>,
    #[serde(
        alias = "Close",
        alias = "close",
        alias = "Adj Close",
        deserialize_with = "csv::invalid_option",
        default
    )]
    close: Option<f64>,
}

/// CSV data source for historical daily prices.
///
/// The path is either a single file, used for any ticker, or a directory
/// containing `{ticker}.csv` / `{ticker}_daily.csv` files.
pub struct CsvPriceSource {
    path: PathBuf,
}

impl CsvPriceSource {
    /// Create a new CSV data source.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, DataError> {
        let path = path.into();
        if !path.exists() {
            return Err(DataError::Internal(format!(
                "CSV path '{}' does not exist",
                path.display()
            )));
        }
        Ok(Self { path })
    }

    /// Resolve the file holding a ticker's history.
    fn file_for(&self, ticker: &str) -> Result<PathBuf, DataError> {
        if self.path.is_file() {
            return Ok(self.path.clone());
        }
        let lower = ticker.to_lowercase();
        let candidates = [
            self.path.join(format!("{}.csv", ticker)),
            self.path.join(format!("{}.csv", lower)),
            self.path.join(format!("{}_daily.csv", ticker)),
            self.path.join(format!("{}_daily.csv", lower)),
        ];
        candidates
            .into_iter()
            .find(|p| p.exists())
            .ok_or_else(|| DataError::SymbolNotFound(ticker.to_string()))
    }

    /// Load all bars from a CSV file, sorted by date.
    pub fn load_from_path(path: &Path) -> Result<Vec<PriceBar>, DataError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .map_err(|e| DataError::ParseError(e.to_string()))?;

        let mut bars = Vec::new();

        for result in reader.deserialize() {
            let record: CsvRecord = result.map_err(|e| DataError::ParseError(e.to_string()))?;
            let date = parse_date(&record.date)?;
            bars.push(PriceBar::from_options(date, record.high, record.low, record.close));
        }

        bars.sort_by_key(|b| b.date);

        Ok(bars)
    }
}

#[async_trait]
impl PriceSource for CsvPriceSource {
    async fn fetch_prices(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DataError> {
        let file = self.file_for(ticker)?;
        let bars: Vec<PriceBar> = Self::load_from_path(&file)?
            .into_iter()
            .filter(|b| b.date >= start && b.date <= end)
            .collect();

        debug!(ticker, file = %file.display(), bars = bars.len(), "Loaded CSV prices");

        if bars.is_empty() {
            return Err(DataError::NoDataAvailable);
        }
        Ok(PriceSeries::new(ticker, bars))
    }

    fn name(&self) -> &str {
        "csv"
    }
}

/// Parse various date formats.
fn parse_date(date_str: &str) -> Result<NaiveDate, DataError> {
    let date_str = date_str.trim();
    let formats = ["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d", "%m/%d/%Y", "%d-%m-%Y"];

    for format in formats {
        if let Ok(d) = NaiveDate::parse_from_str(date_str, format) {
            return Ok(d);
        }
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt.date());
    }

    // Try parsing as Unix timestamp
    if let Ok(ts) = date_str.parse::<i64>() {
        // Assume milliseconds if > 10 digits
        let millis = if ts > 10_000_000_000 { ts } else { ts * 1000 };
        if let Some(dt) = DateTime::from_timestamp_millis(millis) {
            return Ok(dt.date_naive());
        }
    }

    Err(DataError::ParseError(format!(
        "Could not parse date: {}",
        date_str
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-01-15").unwrap(), date(2024, 1, 15));
        assert_eq!(parse_date("2024/01/15").unwrap(), date(2024, 1, 15));
        assert_eq!(parse_date("20240115").unwrap(), date(2024, 1, 15));
        assert_eq!(parse_date("2024-01-15 10:30:00").unwrap(), date(2024, 1, 15));
        assert_eq!(parse_date("1705312800000").unwrap(), date(2024, 1, 15)); // Unix ms
        assert_eq!(parse_date("1705312800").unwrap(), date(2024, 1, 15)); // Unix sec
        assert!(parse_date("yesterday").is_err());
    }

    #[tokio::test]
    async fn test_load_directory_and_filter_range() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("600519.csv")).unwrap();
        writeln!(file, "Date,Open,High,Low,Close,Volume").unwrap();
        writeln!(file, "2024-01-04,10,11,9,10.5,100").unwrap();
        writeln!(file, "2024-01-02,10,12,9,11,100").unwrap();
        writeln!(file, "2024-01-03,10,,9,n/a,100").unwrap();
        writeln!(file, "2023-12-29,10,11,9,10,100").unwrap();
        drop(file);

        let source = CsvPriceSource::new(dir.path()).unwrap();
        let series = source
            .fetch_prices("600519", date(2024, 1, 1), date(2024, 1, 31))
            .await
            .unwrap();

        assert_eq!(series.len(), 3);
        assert!(series.is_ordered());
        assert_eq!(series.get(0).unwrap().close, Some(11.0));
        assert_eq!(series.get(1).unwrap().high, None);
        assert_eq!(series.get(1).unwrap().close, None);
        assert_eq!(series.get(1).unwrap().low, Some(9.0));
    }

    #[tokio::test]
    async fn test_unknown_ticker() {
        let dir = tempfile::tempdir().unwrap();
        let source = CsvPriceSource::new(dir.path()).unwrap();
        let result = source
            .fetch_prices("AAPL", date(2024, 1, 1), date(2024, 12, 31))
            .await;

        assert!(matches!(result, Err(DataError::SymbolNotFound(_))));
    }

    #[test]
    fn test_missing_path() {
        assert!(CsvPriceSource::new("/definitely/not/here").is_err());
    }
}
