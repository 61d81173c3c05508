//! MACD and KDJ indicator engine.
//!
//! This crate provides:
//! - A seeded exponential moving average (first output equals first input)
//! - MACD (DIF, DEA, histogram) built from seeded EMAs
//! - KDJ (RSV, %K, %D, %J) with recursive 1/3 smoothing
//!
//! Every indicator emits one value per input bar. Values that are not yet
//! defined are `None`, never NaN.

mod engine;
pub mod momentum;
pub mod moving_average;

pub use engine::{compute_indicators, IndicatorEngine};
pub use momentum::{Kdj, KdjOutput, Macd, MacdOutput};
pub use moving_average::{EmaState, SeededEma};
