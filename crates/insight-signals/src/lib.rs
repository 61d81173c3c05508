//! Signal derivation from indicator values.
//!
//! Classifies the latest indicator row into momentum (MACD) and
//! overbought/oversold (KDJ %J) signals.

mod classifier;

pub use classifier::{derive_signals, SignalClassifier, SignalThresholds};
