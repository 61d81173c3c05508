//! Headline price statistics.

use insight_core::types::PriceSeries;
use serde::{Deserialize, Serialize};

/// Trading days in roughly one month.
const MONTH_ROWS: usize = 21;
/// Trading days in roughly three months.
const QUARTER_ROWS: usize = 63;

/// Latest close and percentage changes over fixed lookbacks.
///
/// A change is `None` when the series is too short or either close is
/// missing.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Overview {
    pub latest_close: Option<f64>,
    pub change_1m_pct: Option<f64>,
    pub change_3m_pct: Option<f64>,
    pub change_total_pct: Option<f64>,
}

impl Overview {
    pub fn from_prices(prices: &PriceSeries) -> Self {
        let latest_close = prices.last().and_then(|b| b.close);
        let len = prices.len();

        let change_since = |index: usize| -> Option<f64> {
            pct_change(prices.get(index)?.close?, latest_close?)
        };
        // `rows` bars counted back from the latest one, which is bar 1
        let lookback = |rows: usize| (len > rows).then(|| change_since(len - rows)).flatten();

        Self {
            latest_close,
            change_1m_pct: lookback(MONTH_ROWS),
            change_3m_pct: lookback(QUARTER_ROWS),
            change_total_pct: (len > 1).then(|| change_since(0)).flatten(),
        }
    }
}

fn pct_change(from: f64, to: f64) -> Option<f64> {
    if from == 0.0 {
        return None;
    }
    Some((to / from - 1.0) * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, NaiveDate};
    use insight_core::types::PriceBar;

    fn series(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PriceBar::new(start + Days::new(i as u64), c + 1.0, c - 1.0, c))
            .collect();
        PriceSeries::new("TEST", bars)
    }

    #[test]
    fn test_empty_series() {
        assert_eq!(Overview::from_prices(&series(&[])), Overview::default());
    }

    #[test]
    fn test_short_series() {
        let overview = Overview::from_prices(&series(&[100.0, 110.0]));

        assert_eq!(overview.latest_close, Some(110.0));
        assert_eq!(overview.change_1m_pct, None);
        assert_eq!(overview.change_3m_pct, None);
        assert!((overview.change_total_pct.unwrap() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_month_lookback() {
        // 22 rows: the month comparison uses the close 21 bars from the
        // end counting the latest, not the first close
        let mut closes = vec![50.0];
        closes.extend(std::iter::repeat(60.0).take(20));
        closes.push(75.0);
        let overview = Overview::from_prices(&series(&closes));

        assert!((overview.change_1m_pct.unwrap() - 25.0).abs() < 1e-9);
        assert!((overview.change_total_pct.unwrap() - 50.0).abs() < 1e-9);
        assert_eq!(overview.change_3m_pct, None);
    }

    #[test]
    fn test_quarter_lookback() {
        // 64 rows: index 1 is 63 bars from the end counting the latest
        let mut closes = vec![10.0, 80.0];
        closes.extend(std::iter::repeat(90.0).take(61));
        closes.push(100.0);
        let overview = Overview::from_prices(&series(&closes));

        assert!((overview.change_3m_pct.unwrap() - 25.0).abs() < 1e-9);
        assert!((overview.change_1m_pct.unwrap() - (100.0 / 90.0 - 1.0) * 100.0).abs() < 1e-9);
        assert!((overview.change_total_pct.unwrap() - 900.0).abs() < 1e-9);
    }

    #[test]
    fn test_exactly_month_rows_has_no_change() {
        let closes: Vec<f64> = (0..21).map(|i| 100.0 + i as f64).collect();
        assert_eq!(Overview::from_prices(&series(&closes)).change_1m_pct, None);
    }

    #[test]
    fn test_missing_close() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let prices = PriceSeries::new(
            "TEST",
            vec![
                PriceBar::from_options(start, Some(1.0), Some(1.0), None),
                PriceBar::new(start + Days::new(1), 2.0, 2.0, 2.0),
            ],
        );
        let overview = Overview::from_prices(&prices);

        assert_eq!(overview.latest_close, Some(2.0));
        assert_eq!(overview.change_total_pct, None);
    }
}
