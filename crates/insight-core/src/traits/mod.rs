//! Core traits for stock insight.

mod data_source;
mod indicator;

pub use data_source::{MetricsSource, PriceSource};
pub use indicator::Indicator;
