//! Data source trait definitions.

use crate::error::DataError;
use crate::types::{FinancialMetrics, PriceSeries};
use async_trait::async_trait;
use chrono::NaiveDate;

/// Trait for historical daily price sources.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Fetch daily bars.
    ///
    /// # Arguments
    /// * `ticker` - The ticker to fetch
    /// * `start` - First date of the range (inclusive)
    /// * `end` - Last date of the range (inclusive)
    ///
    /// # Returns
    /// A series ordered from oldest to newest
    async fn fetch_prices(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DataError>;

    /// Get the data source name.
    fn name(&self) -> &str;
}

/// Trait for valuation/financial ratio sources.
#[async_trait]
pub trait MetricsSource: Send + Sync {
    /// Fetch the latest financial ratios. Individual ratios may be absent.
    async fn fetch_metrics(&self, ticker: &str) -> Result<FinancialMetrics, DataError>;

    /// Get the source name.
    fn name(&self) -> &str;
}

#[async_trait]
impl<T: PriceSource + ?Sized> PriceSource for Box<T> {
    async fn fetch_prices(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DataError> {
        (**self).fetch_prices(ticker, start, end).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[async_trait]
impl<T: MetricsSource + ?Sized> MetricsSource for Box<T> {
    async fn fetch_metrics(&self, ticker: &str) -> Result<FinancialMetrics, DataError> {
        (**self).fetch_metrics(ticker).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
