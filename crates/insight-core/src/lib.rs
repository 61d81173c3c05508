//! Core types and traits for stock insight.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (PriceBar, PriceSeries, FinancialMetrics)
//! - Indicator output types (IndicatorRow, IndicatorSeries)
//! - Derived signals
//! - Collaborator traits for price and fundamentals sources

pub mod types;
pub mod traits;
pub mod error;

pub use error::{InsightError, InsightResult};
pub use types::*;
pub use traits::*;
