//! Fallback to synthetic data when the primary source fails.

use async_trait::async_trait;
use chrono::NaiveDate;
use insight_core::error::DataError;
use insight_core::traits::{MetricsSource, PriceSource};
use insight_core::types::{FinancialMetrics, PriceSeries};
use tracing::warn;

use crate::synthetic::SyntheticSource;

/// Wraps a primary source and substitutes deterministic synthetic data for
/// anything it cannot deliver.
///
/// Prices: any error or an empty series is replaced by the generated series.
/// Metrics: an error counts as "all missing"; every missing ratio is then
/// filled from the generator and recorded in `synthetic_fields`.
pub struct FallbackSource<S> {
    primary: S,
    synthetic: SyntheticSource,
}

impl<S> FallbackSource<S> {
    pub fn new(primary: S, synthetic: SyntheticSource) -> Self {
        Self { primary, synthetic }
    }
}

#[async_trait]
impl<S: PriceSource> PriceSource for FallbackSource<S> {
    async fn fetch_prices(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DataError> {
        match self.primary.fetch_prices(ticker, start, end).await {
            Ok(series) if !series.is_empty() => return Ok(series),
            Ok(_) => warn!(
                ticker,
                source = self.primary.name(),
                "Primary source returned no prices, using synthetic data"
            ),
            Err(e) => warn!(
                ticker,
                source = self.primary.name(),
                error = %e,
                "Price fetch failed, using synthetic data"
            ),
        }
        self.synthetic.generate_prices(ticker, end)
    }

    fn name(&self) -> &str {
        self.primary.name()
    }
}

#[async_trait]
impl<S: MetricsSource> MetricsSource for FallbackSource<S> {
    async fn fetch_metrics(&self, ticker: &str) -> Result<FinancialMetrics, DataError> {
        let mut metrics = match self.primary.fetch_metrics(ticker).await {
            Ok(metrics) => metrics,
            Err(e) => {
                warn!(
                    ticker,
                    source = self.primary.name(),
                    error = %e,
                    "Metrics fetch failed, using synthetic values"
                );
                FinancialMetrics::default()
            }
        };

        let missing = metrics.missing();
        if !missing.is_empty() {
            warn!(ticker, ?missing, "Filling missing metrics with synthetic values");
            let generated = self.synthetic.generate_metrics(ticker, metrics.pe_ttm);
            metrics.fill_missing_from(&generated);
        }
        Ok(metrics)
    }

    fn name(&self) -> &str {
        self.primary.name()
    }
}
