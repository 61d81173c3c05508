//! Indicator trait definitions.

use crate::types::PriceBar;

/// Trait for technical indicators over daily bars.
///
/// Unlike windowed indicators that drop their warm-up region, these
/// indicators emit exactly one output per input bar. Positions where the
/// value is not yet defined carry a missing marker inside `Output`.
pub trait Indicator: Send + Sync {
    /// The output type of the indicator.
    type Output;

    /// Calculate indicator values for the given bars.
    ///
    /// # Returns
    /// A vector with the same length as `bars`
    fn calculate(&self, bars: &[PriceBar]) -> Vec<Self::Output>;

    /// Number of leading bars before the first fully defined output.
    fn warmup(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;

    /// Whether `len` bars are enough to produce at least one defined value.
    fn is_ready(&self, len: usize) -> bool {
        len > self.warmup()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    struct RangeIndicator;

    impl Indicator for RangeIndicator {
        type Output = Option<f64>;

        fn calculate(&self, bars: &[PriceBar]) -> Vec<Option<f64>> {
            bars.iter().map(PriceBar::range).collect()
        }

        fn warmup(&self) -> usize {
            0
        }

        fn name(&self) -> &str {
            "range"
        }
    }

    #[test]
    fn test_output_aligned_with_input() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let bars = vec![
            PriceBar::new(date, 11.0, 9.0, 10.0),
            PriceBar::new(date, f64::NAN, 9.0, 10.0),
        ];
        let result = RangeIndicator.calculate(&bars);

        assert_eq!(result, vec![Some(2.0), None]);
        assert!(RangeIndicator.is_ready(1));
        assert!(!RangeIndicator.is_ready(0));
    }
}
