//! Core data types for stock insight.

mod indicators;
mod metrics;
mod price;
mod signal;

pub use indicators::{IndicatorRow, IndicatorSeries};
pub use metrics::{FinancialMetrics, MetricKind};
pub use price::{PriceBar, PriceSeries};
pub use signal::Signal;
