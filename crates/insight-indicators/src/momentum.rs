//! Momentum indicators.

use insight_core::error::IndicatorError;
use insight_core::traits::Indicator;
use insight_core::types::PriceBar;
use serde::{Deserialize, Serialize};

use crate::moving_average::SeededEma;

/// MACD output for one bar.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MacdOutput {
    /// Short EMA - long EMA
    pub dif: Option<f64>,
    /// Signal line (EMA of DIF)
    pub dea: Option<f64>,
    /// Histogram, 2 * (DIF - DEA)
    pub macd: Option<f64>,
}

/// MACD indicator built from seeded EMAs.
///
/// With every close defined, all three outputs are defined from the first
/// bar: `DIF[0] = 0`, `DEA[0] = 0`, `MACD[0] = 0`.
#[derive(Debug, Clone)]
pub struct Macd {
    short: SeededEma,
    long: SeededEma,
    signal: SeededEma,
}

impl Macd {
    /// Create a new MACD with default parameters (12, 26, 9).
    pub fn new() -> Self {
        Self {
            short: SeededEma::with_span(12),
            long: SeededEma::with_span(26),
            signal: SeededEma::with_span(9),
        }
    }

    /// Create a MACD with custom spans.
    pub fn with_periods(short: usize, long: usize, signal: usize) -> Result<Self, IndicatorError> {
        if short >= long {
            return Err(IndicatorError::InvalidParameter(format!(
                "short span ({}) must be less than long span ({})",
                short, long
            )));
        }
        Ok(Self {
            short: SeededEma::new(short)?,
            long: SeededEma::new(long)?,
            signal: SeededEma::new(signal)?,
        })
    }

    /// Calculate MACD from close prices.
    pub fn calculate_closes(&self, closes: &[Option<f64>]) -> Vec<MacdOutput> {
        let short_ema = self.short.calculate(closes);
        let long_ema = self.long.calculate(closes);

        let dif: Vec<Option<f64>> = short_ema
            .iter()
            .zip(long_ema.iter())
            .map(|(s, l)| Some((*s)? - (*l)?))
            .collect();
        let dea = self.signal.calculate(&dif);

        dif.iter()
            .zip(dea.iter())
            .map(|(&dif, &dea)| MacdOutput {
                dif,
                dea,
                macd: dif.zip(dea).map(|(dif, dea)| 2.0 * (dif - dea)),
            })
            .collect()
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::new()
    }
}

impl Indicator for Macd {
    type Output = MacdOutput;

    fn calculate(&self, bars: &[PriceBar]) -> Vec<MacdOutput> {
        let closes: Vec<Option<f64>> = bars.iter().map(|b| b.close).collect();
        self.calculate_closes(&closes)
    }

    fn warmup(&self) -> usize {
        0
    }

    fn name(&self) -> &str {
        "MACD"
    }
}

/// KDJ output for one bar.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct KdjOutput {
    /// Raw stochastic value
    pub rsv: Option<f64>,
    pub k: Option<f64>,
    pub d: Option<f64>,
    pub j: Option<f64>,
}

/// KDJ stochastic oscillator.
///
/// RSV is the close's position inside the trailing window's low/high range.
/// %K and %D are recursive 1/3 smoothings of RSV and %K, seeded at 50
/// whenever the previous %K is undefined. That includes the first defined
/// RSV and any RSV following an undefined one (short history, missing
/// prices or a flat window), so the oscillator restarts from 50/50 there.
#[derive(Debug, Clone)]
pub struct Kdj {
    window: usize,
}

impl Kdj {
    /// Seed for %K and %D when no previous value exists.
    pub const SEED: f64 = 50.0;
    /// Weight of the newest value in the recursive smoothing.
    const SMOOTHING: f64 = 1.0 / 3.0;

    /// Create a KDJ with the standard 9-bar window.
    pub fn new() -> Self {
        Self { window: 9 }
    }

    /// Create a KDJ with a custom RSV window.
    pub fn with_window(window: usize) -> Result<Self, IndicatorError> {
        if window == 0 {
            return Err(IndicatorError::InvalidParameter(
                "KDJ window must be greater than 0".into(),
            ));
        }
        Ok(Self { window })
    }

    /// Raw stochastic values, one per bar.
    pub fn rsv(&self, bars: &[PriceBar]) -> Vec<Option<f64>> {
        (0..bars.len())
            .map(|i| {
                if i + 1 < self.window {
                    return None;
                }
                let window = &bars[i + 1 - self.window..=i];
                let (low_min, high_max) = window_extremes(window)?;
                let range = high_max - low_min;
                if range == 0.0 {
                    return None;
                }
                let rsv = (bars[i].close? - low_min) / range * 100.0;
                rsv.is_finite().then_some(rsv)
            })
            .collect()
    }

    /// Smooth RSV values into K/D/J.
    pub fn smooth(&self, rsv: &[Option<f64>]) -> Vec<KdjOutput> {
        rsv.iter()
            .scan(None::<(f64, f64)>, |prev, &rsv| {
                let Some(r) = rsv else {
                    *prev = None;
                    return Some(KdjOutput::default());
                };
                let (k_prev, d_prev) = prev.unwrap_or((Self::SEED, Self::SEED));
                let k = (1.0 - Self::SMOOTHING) * k_prev + Self::SMOOTHING * r;
                let d = (1.0 - Self::SMOOTHING) * d_prev + Self::SMOOTHING * k;
                *prev = Some((k, d));
                Some(KdjOutput {
                    rsv: Some(r),
                    k: Some(k),
                    d: Some(d),
                    j: Some(3.0 * k - 2.0 * d),
                })
            })
            .collect()
    }
}

/// Lowest low and highest high of a window; `None` if any value is missing.
fn window_extremes(window: &[PriceBar]) -> Option<(f64, f64)> {
    window
        .iter()
        .try_fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), bar| {
            Some((lo.min(bar.low?), hi.max(bar.high?)))
        })
}

impl Default for Kdj {
    fn default() -> Self {
        Self::new()
    }
}

impl Indicator for Kdj {
    type Output = KdjOutput;

    fn calculate(&self, bars: &[PriceBar]) -> Vec<KdjOutput> {
        self.smooth(&self.rsv(bars))
    }

    fn warmup(&self) -> usize {
        self.window - 1
    }

    fn name(&self) -> &str {
        "KDJ"
    }
}
