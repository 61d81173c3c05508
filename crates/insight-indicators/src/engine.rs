//! Combined MACD/KDJ computation over a price series.

use insight_core::traits::Indicator;
use insight_core::types::{IndicatorRow, IndicatorSeries, PriceSeries};
use tracing::debug;

use crate::momentum::{Kdj, Macd};

/// Computes every indicator for a series in one pass.
///
/// Holds no mutable state, so a single engine may be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct IndicatorEngine {
    macd: Macd,
    kdj: Kdj,
}

impl IndicatorEngine {
    /// Engine with the standard MACD(12, 26, 9) and KDJ(9) parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with custom indicator parameters.
    pub fn with_indicators(macd: Macd, kdj: Kdj) -> Self {
        Self { macd, kdj }
    }

    /// Compute indicators. The output has exactly one row per input bar.
    pub fn compute(&self, series: &PriceSeries) -> IndicatorSeries {
        let bars = series.bars();
        let macd = self.macd.calculate(bars);
        let kdj = self.kdj.calculate(bars);

        let rows: IndicatorSeries = bars
            .iter()
            .zip(macd)
            .zip(kdj)
            .map(|((bar, m), k)| IndicatorRow {
                date: Some(bar.date),
                dif: m.dif,
                dea: m.dea,
                macd: m.macd,
                rsv: k.rsv,
                k: k.k,
                d: k.d,
                j: k.j,
            })
            .collect();

        debug!(
            ticker = %series.ticker,
            bars = bars.len(),
            kdj_from = ?rows.first_kdj_index(),
            "Computed indicators"
        );
        rows
    }
}

/// Compute MACD and KDJ with the standard parameters.
pub fn compute_indicators(series: &PriceSeries) -> IndicatorSeries {
    IndicatorEngine::new().compute(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, NaiveDate};
    use insight_core::types::PriceBar;

    fn series(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PriceBar::new(start + Days::new(i as u64), c + 1.0, c - 1.0, c))
            .collect();
        PriceSeries::new("600519", bars)
    }

    #[test]
    fn test_empty_series() {
        let result = compute_indicators(&series(&[]));
        assert!(result.is_empty());
    }

    #[test]
    fn test_rows_aligned_with_bars() {
        let input = series(&[100.0, 102.0, 101.0, 105.0, 107.0, 106.0, 110.0, 108.0, 112.0, 115.0]);
        let result = compute_indicators(&input);

        assert_eq!(result.len(), input.len());
        for (row, bar) in result.iter().zip(input.iter()) {
            assert_eq!(row.date, Some(bar.date));
            assert!(row.dif.is_some() && row.dea.is_some() && row.macd.is_some());
        }
        assert_eq!(result.first_kdj_index(), Some(8));
        assert!((result.get(8).unwrap().k.unwrap() - 64.28571428571428).abs() < 1e-9);
    }

    #[test]
    fn test_deterministic() {
        let closes: Vec<f64> = (0..250).map(|i| 50.0 + (i as f64 * 0.11).sin() * 8.0).collect();
        let input = series(&closes);

        let first = compute_indicators(&input);
        let second = compute_indicators(&input);
        assert_eq!(first, second);
    }

    #[test]
    fn test_single_bar() {
        let result = compute_indicators(&series(&[10.0]));
        let row = result.last().unwrap();

        assert_eq!(row.dif, Some(0.0));
        assert_eq!(row.macd, Some(0.0));
        assert_eq!(row.k, None);
        assert_eq!(row.j, None);
    }

    #[test]
    fn test_custom_indicator_parameters() {
        let input = series(&[100.0, 102.0, 101.0, 105.0, 107.0, 106.0, 110.0, 108.0, 112.0, 115.0]);
        let engine = IndicatorEngine::with_indicators(
            Macd::with_periods(3, 6, 2).unwrap(),
            Kdj::with_window(3).unwrap(),
        );
        let custom = engine.compute(&input);
        let standard = IndicatorEngine::new().compute(&input);

        assert_eq!(custom.len(), input.len());
        assert_eq!(custom.first_kdj_index(), Some(2));
        assert_eq!(standard.first_kdj_index(), Some(8));
        assert_ne!(custom.last().unwrap().dif, standard.last().unwrap().dif);
    }

    #[test]
    fn test_engine_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<IndicatorEngine>();
    }
}
