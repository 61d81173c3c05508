//! Daily price observations.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Keep only finite values; NaN and infinities become missing.
#[inline]
fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// One daily observation.
///
/// Any price may be missing. `high >= low` is expected but not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    /// Trading date
    pub date: NaiveDate,
    /// Highest price
    pub high: Option<f64>,
    /// Lowest price
    pub low: Option<f64>,
    /// Closing price
    pub close: Option<f64>,
}

impl PriceBar {
    /// Create a new bar. Non-finite prices are stored as missing.
    pub fn new(date: NaiveDate, high: f64, low: f64, close: f64) -> Self {
        Self {
            date,
            high: finite(high),
            low: finite(low),
            close: finite(close),
        }
    }

    /// Create a bar from optional prices.
    pub fn from_options(
        date: NaiveDate,
        high: Option<f64>,
        low: Option<f64>,
        close: Option<f64>,
    ) -> Self {
        Self {
            date,
            high: high.and_then(finite),
            low: low.and_then(finite),
            close: close.and_then(finite),
        }
    }

    /// The bar's range (high - low), when both ends are present.
    #[inline]
    pub fn range(&self) -> Option<f64> {
        Some(self.high? - self.low?)
    }
}

/// Ordered daily price history for a single ticker.
///
/// Bars are expected in ascending date order. Consumers do not re-sort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    /// Ticker symbol
    pub ticker: String,
    /// Whether the bars were generated rather than fetched
    pub synthetic: bool,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Create a series from bars already in date order.
    pub fn new(ticker: impl Into<String>, bars: Vec<PriceBar>) -> Self {
        Self {
            ticker: ticker.into(),
            synthetic: false,
            bars,
        }
    }

    /// Mark the series as generated data.
    pub fn into_synthetic(mut self) -> Self {
        self.synthetic = true;
        self
    }

    /// Get the number of bars.
    #[inline]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Check if the series is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Get all bars as a slice.
    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    /// Get the last N bars.
    pub fn last_n(&self, n: usize) -> &[PriceBar] {
        let start = self.bars.len().saturating_sub(n);
        &self.bars[start..]
    }

    /// Get the first bar.
    pub fn first(&self) -> Option<&PriceBar> {
        self.bars.first()
    }

    /// Get the last bar.
    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    /// Get a bar by index (0 = oldest).
    pub fn get(&self, index: usize) -> Option<&PriceBar> {
        self.bars.get(index)
    }

    /// Extract dates as a vector.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    /// Extract close prices as a vector.
    pub fn closes(&self) -> Vec<Option<f64>> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Extract low prices as a vector.
    pub fn lows(&self) -> Vec<Option<f64>> {
        self.bars.iter().map(|b| b.low).collect()
    }

    /// Check that dates are strictly ascending.
    pub fn is_ordered(&self) -> bool {
        self.bars.windows(2).all(|w| w[0].date < w[1].date)
    }

    /// Get an iterator over the bars.
    pub fn iter(&self) -> impl Iterator<Item = &PriceBar> {
        self.bars.iter()
    }
}
