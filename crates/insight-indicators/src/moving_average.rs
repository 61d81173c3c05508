//! Moving average indicators.

use insight_core::error::IndicatorError;

/// Exponential Moving Average seeded with the first observation.
///
/// `EMA[0] = x[0]` and `EMA[i] = a * x[i] + (1 - a) * EMA[i-1]` with
/// `a = 2 / (span + 1)`, so there is no warm-up region. This is the
/// non-adjusted exponentially weighted mean rather than the SMA-seeded EMA.
#[derive(Debug, Clone, Copy)]
pub struct SeededEma {
    alpha: f64,
}

impl SeededEma {
    /// Create a new EMA with the given span.
    pub fn new(span: usize) -> Result<Self, IndicatorError> {
        if span == 0 {
            return Err(IndicatorError::InvalidParameter(
                "EMA span must be greater than 0".into(),
            ));
        }
        Ok(Self::with_span(span))
    }

    /// Caller guarantees `span > 0`.
    pub(crate) fn with_span(span: usize) -> Self {
        Self {
            alpha: 2.0 / (span as f64 + 1.0),
        }
    }

    /// Smoothing factor.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Fresh streaming state for this EMA.
    pub fn state(&self) -> EmaState {
        EmaState::new(self.alpha)
    }

    /// Calculate the EMA of `data`, one output per input.
    pub fn calculate(&self, data: &[Option<f64>]) -> Vec<Option<f64>> {
        let mut state = self.state();
        data.iter().map(|&value| state.update(value)).collect()
    }
}

/// Streaming state of a [`SeededEma`].
///
/// Missing inputs before the first observation keep the average undefined.
/// A missing input afterwards repeats the previous average; the next
/// observation is then blended against the old average decayed once per
/// elapsed step: `(w * prev + a * x) / (w + a)` with `w = (1 - a)^(gap + 1)`.
#[derive(Debug, Clone)]
pub struct EmaState {
    alpha: f64,
    current: Option<f64>,
    gap: i32,
}

impl EmaState {
    fn new(alpha: f64) -> Self {
        Self {
            alpha,
            current: None,
            gap: 0,
        }
    }

    /// Update with a new value and return the current EMA.
    pub fn update(&mut self, value: Option<f64>) -> Option<f64> {
        match (self.current, value) {
            (None, Some(x)) => {
                self.current = Some(x);
            }
            (Some(prev), Some(x)) => {
                let next = if self.gap == 0 {
                    self.alpha * x + (1.0 - self.alpha) * prev
                } else {
                    let old_weight = (1.0 - self.alpha).powi(self.gap.saturating_add(1));
                    (old_weight * prev + self.alpha * x) / (old_weight + self.alpha)
                };
                self.current = Some(next);
                self.gap = 0;
            }
            (Some(_), None) => {
                self.gap = self.gap.saturating_add(1);
            }
            (None, None) => {}
        }
        self.current
    }

    /// Get the current EMA value.
    pub fn current(&self) -> Option<f64> {
        self.current
    }

    /// Reset the state.
    pub fn reset(&mut self) {
        self.current = None;
        self.gap = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defined(data: &[f64]) -> Vec<Option<f64>> {
        data.iter().copied().map(Some).collect()
    }

    #[test]
    fn test_zero_span_rejected() {
        assert!(SeededEma::new(0).is_err());
        assert!(SeededEma::new(1).is_ok());
    }

    #[test]
    fn test_alpha_from_span() {
        assert_eq!(SeededEma::new(1).unwrap().alpha(), 1.0);
        assert_eq!(SeededEma::new(3).unwrap().alpha(), 0.5);
        assert!((SeededEma::new(12).unwrap().alpha() - 2.0 / 13.0).abs() < 1e-15);
    }

    #[test]
    fn test_seeded_ema() {
        let ema = SeededEma::new(3).unwrap();
        let result = ema.calculate(&defined(&[1.0, 2.0, 3.0, 4.0, 5.0]));

        assert_eq!(result.len(), 5);
        // First output equals first input
        assert_eq!(result[0], Some(1.0));
        // alpha = 0.5: 0.5 * 2 + 0.5 * 1
        assert!((result[1].unwrap() - 1.5).abs() < 1e-12);
        assert!((result[2].unwrap() - 2.25).abs() < 1e-12);
    }

    #[test]
    fn test_span_one_tracks_input() {
        let ema = SeededEma::new(1).unwrap();
        let result = ema.calculate(&defined(&[3.0, 7.0, -2.0]));
        assert_eq!(result, defined(&[3.0, 7.0, -2.0]));
    }

    #[test]
    fn test_leading_missing_values() {
        let ema = SeededEma::new(3).unwrap();
        let result = ema.calculate(&[None, None, Some(4.0), Some(6.0)]);

        assert_eq!(result[0], None);
        assert_eq!(result[1], None);
        assert_eq!(result[2], Some(4.0));
        assert!((result[3].unwrap() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_gap_decays_old_weight() {
        let ema = SeededEma::new(3).unwrap();
        let result = ema.calculate(&[Some(10.0), None, Some(12.0), Some(11.0)]);

        // Held through the gap
        assert_eq!(result[1], Some(10.0));
        // (0.25 * 10 + 0.5 * 12) / 0.75
        assert!((result[2].unwrap() - 11.333333333333334).abs() < 1e-12);
        assert!((result[3].unwrap() - 11.166666666666668).abs() < 1e-12);
    }

    #[test]
    fn test_streaming_reset() {
        let ema = SeededEma::new(5).unwrap();
        let mut state = ema.state();
        state.update(Some(1.0));
        state.update(Some(2.0));
        assert!(state.current().is_some());

        state.reset();
        assert!(state.current().is_none());
        assert_eq!(state.update(Some(9.0)), Some(9.0));
    }

    #[test]
    fn test_saturated_gap_stays_finite() {
        let mut state = SeededEma::new(3).unwrap().state();
        state.update(Some(10.0));
        state.gap = i32::MAX;

        // The old value's weight underflows to zero, so the next one wins
        let next = state.update(Some(12.0)).unwrap();
        assert!(next.is_finite());
        assert!((next - 12.0).abs() < 1e-12);
        assert_eq!(state.gap, 0);
    }
}
