//! Signal classification over the latest indicator row.
//!
//! MACD momentum: DIF above DEA with a positive histogram is bullish, DIF
//! below DEA with a negative histogram is bearish. KDJ: %J under the
//! oversold level or over the overbought level. Missing values never fire.

use insight_core::error::InsightError;
use insight_core::types::{IndicatorRow, IndicatorSeries, Signal};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// %J thresholds for the KDJ signals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalThresholds {
    /// %J below this is oversold
    pub oversold: f64,
    /// %J above this is overbought
    pub overbought: f64,
}

impl Default for SignalThresholds {
    fn default() -> Self {
        Self {
            oversold: 20.0,
            overbought: 80.0,
        }
    }
}

impl SignalThresholds {
    pub fn validate(&self) -> Result<(), InsightError> {
        if !self.oversold.is_finite() || !self.overbought.is_finite() {
            return Err(InsightError::Config(
                "Signal thresholds must be finite".into(),
            ));
        }
        if self.overbought <= self.oversold {
            return Err(InsightError::Config(
                "Overbought must be greater than oversold".into(),
            ));
        }
        Ok(())
    }
}

/// Stateless classifier.
#[derive(Debug, Clone, Default)]
pub struct SignalClassifier {
    thresholds: SignalThresholds,
}

impl SignalClassifier {
    pub fn new(thresholds: SignalThresholds) -> Self {
        Self { thresholds }
    }

    /// Classify a single row. Any subset of signals may fire.
    pub fn classify(&self, row: &IndicatorRow) -> Vec<Signal> {
        let mut signals = Vec::new();

        if let (Some(dif), Some(dea), Some(macd)) = (row.dif, row.dea, row.macd) {
            if dif > dea && macd > 0.0 {
                signals.push(Signal::BullishMomentum);
            } else if dif < dea && macd < 0.0 {
                signals.push(Signal::BearishMomentum);
            }
        }

        if let Some(j) = row.j {
            if j < self.thresholds.oversold {
                signals.push(Signal::Oversold);
            } else if j > self.thresholds.overbought {
                signals.push(Signal::Overbought);
            }
        }

        signals
    }

    /// Classify the latest row of a series. Empty series yield no signals.
    pub fn classify_latest(&self, series: &IndicatorSeries) -> Vec<Signal> {
        let Some(row) = series.last() else {
            return Vec::new();
        };
        let signals = self.classify(row);
        debug!(date = ?row.date, signals = %Signal::describe(&signals), "Classified latest row");
        signals
    }
}

/// Classify the latest row with the default 20/80 thresholds.
pub fn derive_signals(series: &IndicatorSeries) -> Vec<Signal> {
    SignalClassifier::default().classify_latest(series)
}
