//! Price and fundamentals sources.
//!
//! - [`EastmoneySource`]: remote daily klines and valuation ratios
//! - [`CsvPriceSource`]: local CSV history
//! - [`SyntheticSource`]: deterministic generated data
//! - [`FallbackSource`]: wraps any source and substitutes synthetic data

mod csv_source;
mod eastmoney;
mod fallback;
mod synthetic;

pub use csv_source::CsvPriceSource;
pub use eastmoney::{EastmoneyConfig, EastmoneySource, DEFAULT_KLINE_URL, DEFAULT_QUOTE_URL};
pub use fallback::FallbackSource;
pub use synthetic::{ticker_seed, SyntheticSource, DEFAULT_SYNTHETIC_DAYS};

use chrono::NaiveDate;
use insight_core::error::DataError;
use insight_core::traits::{MetricsSource, PriceSource};
use insight_core::types::{FinancialMetrics, PriceSeries};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

/// Which primary price source to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Eastmoney,
    Csv,
    Synthetic,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Eastmoney => write!(f, "eastmoney"),
            SourceKind::Csv => write!(f, "csv"),
            SourceKind::Synthetic => write!(f, "synthetic"),
        }
    }
}

impl std::str::FromStr for SourceKind {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "eastmoney" => Ok(SourceKind::Eastmoney),
            "csv" => Ok(SourceKind::Csv),
            "synthetic" => Ok(SourceKind::Synthetic),
            other => Err(DataError::Internal(format!("Unknown data source: {}", other))),
        }
    }
}

/// The pair of collaborators a run acquires its data from.
pub struct Acquisition {
    prices: Box<dyn PriceSource>,
    metrics: Option<Box<dyn MetricsSource>>,
}

impl Acquisition {
    /// Without a metrics source, every ratio is reported missing.
    pub fn new(prices: Box<dyn PriceSource>, metrics: Option<Box<dyn MetricsSource>>) -> Self {
        Self { prices, metrics }
    }

    /// Wrap both collaborators in synthetic fallbacks.
    pub fn with_fallback(self, synthetic: SyntheticSource) -> Self {
        let metrics_primary: Box<dyn MetricsSource> = match self.metrics {
            Some(metrics) => metrics,
            None => Box::new(NoMetrics),
        };
        Self {
            prices: Box::new(FallbackSource::new(self.prices, synthetic.clone())),
            metrics: Some(Box::new(FallbackSource::new(metrics_primary, synthetic))),
        }
    }

    pub fn price_source(&self) -> &str {
        self.prices.name()
    }

    /// Fetch prices and metrics concurrently.
    pub async fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<(PriceSeries, FinancialMetrics), DataError> {
        let prices = self.prices.fetch_prices(ticker, start, end);
        let metrics = async {
            match &self.metrics {
                Some(source) => source.fetch_metrics(ticker).await,
                None => Ok(FinancialMetrics::default()),
            }
        };

        let (prices, metrics) = tokio::join!(prices, metrics);
        let prices = prices?;
        let metrics = metrics?;

        info!(
            ticker,
            source = self.prices.name(),
            bars = prices.len(),
            synthetic = prices.synthetic,
            "Acquired data"
        );
        Ok((prices, metrics))
    }
}

/// Metrics source for price-only backends; reports every ratio missing.
struct NoMetrics;

#[async_trait::async_trait]
impl MetricsSource for NoMetrics {
    async fn fetch_metrics(&self, _ticker: &str) -> Result<FinancialMetrics, DataError> {
        Ok(FinancialMetrics::default())
    }

    fn name(&self) -> &str {
        "none"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range() -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(2023, 7, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
        )
    }

    #[test]
    fn test_source_kind_parse() {
        assert_eq!("CSV".parse::<SourceKind>().unwrap(), SourceKind::Csv);
        assert_eq!(SourceKind::Synthetic.to_string(), "synthetic");
        assert!("bloomberg".parse::<SourceKind>().is_err());
    }

    #[tokio::test]
    async fn test_price_only_acquisition_reports_missing_metrics() {
        let (start, end) = range();
        let acquisition = Acquisition::new(Box::new(SyntheticSource::new(20)), None);
        let (prices, metrics) = acquisition.fetch("AAPL", start, end).await.unwrap();

        assert_eq!(prices.len(), 20);
        assert_eq!(metrics.missing().len(), 5);
    }

    #[tokio::test]
    async fn test_fallback_covers_missing_csv_ticker() {
        let (start, end) = range();
        let dir = tempfile::tempdir().unwrap();
        let csv = CsvPriceSource::new(dir.path()).unwrap();
        let acquisition =
            Acquisition::new(Box::new(csv), None).with_fallback(SyntheticSource::default());
        let (prices, metrics) = acquisition.fetch("AAPL", start, end).await.unwrap();

        assert!(prices.synthetic);
        assert_eq!(prices.len(), 250);
        assert!(metrics.missing().is_empty());
        assert_eq!(acquisition.price_source(), "csv");
    }
}
