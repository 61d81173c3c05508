//! Deterministic synthetic data, used when a real source is unavailable.

use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use insight_core::error::DataError;
use insight_core::traits::{MetricsSource, PriceSource};
use insight_core::types::{FinancialMetrics, MetricKind, PriceBar, PriceSeries};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use statrs::distribution::Normal;

/// Default number of generated daily bars.
pub const DEFAULT_SYNTHETIC_DAYS: usize = 250;

/// Stable 64-bit FNV-1a hash, so seeds survive process restarts and
/// compiler upgrades.
pub fn ticker_seed(ticker: &str) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    ticker
        .trim()
        .bytes()
        .fold(OFFSET, |hash, byte| (hash ^ u64::from(byte)).wrapping_mul(PRIME))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Seeded random-walk prices and uniform financial ratios.
///
/// The same ticker always yields the same values.
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    days: usize,
}

impl SyntheticSource {
    pub fn new(days: usize) -> Self {
        Self { days: days.max(1) }
    }

    pub fn days(&self) -> usize {
        self.days
    }

    /// Generate `days` consecutive daily bars ending at `end`.
    ///
    /// `close = 100 + cumsum(N(0, 1))`, `high = close + U(0, 2)`,
    /// `low = close - U(0, 2)`.
    pub fn generate_prices(&self, ticker: &str, end: NaiveDate) -> Result<PriceSeries, DataError> {
        let mut rng = StdRng::seed_from_u64(ticker_seed(ticker));
        let normal = Normal::new(0.0, 1.0).map_err(|e| DataError::Internal(e.to_string()))?;

        let steps: Vec<f64> = (0..self.days).map(|_| rng.sample(&normal)).collect();
        let mut close = 100.0;
        let closes: Vec<f64> = steps
            .iter()
            .map(|step| {
                close += step;
                close
            })
            .collect();
        let high_spread: Vec<f64> = (0..self.days).map(|_| rng.gen_range(0.0..2.0)).collect();
        let low_spread: Vec<f64> = (0..self.days).map(|_| rng.gen_range(0.0..2.0)).collect();

        let first = end
            .checked_sub_days(Days::new(self.days as u64 - 1))
            .ok_or_else(|| DataError::Internal("synthetic date range underflow".into()))?;

        let bars = closes
            .iter()
            .zip(high_spread.iter().zip(low_spread.iter()))
            .zip(first.iter_days())
            .map(|((&close, (&up, &down)), date)| PriceBar::new(date, close + up, close - down, close))
            .collect();

        Ok(PriceSeries::new(ticker, bars).into_synthetic())
    }

    /// Generate financial ratios. When `pe_hint` is given, the industry
    /// average P/E is derived from it instead of the generated P/E.
    pub fn generate_metrics(&self, ticker: &str, pe_hint: Option<f64>) -> FinancialMetrics {
        let mut rng = StdRng::seed_from_u64(ticker_seed(ticker).rotate_left(32));

        let pe_ttm = round2(rng.gen_range(10.0..30.0));
        let pb = round2(rng.gen_range(1.0..5.0));
        let roe = round2(rng.gen_range(5.0..25.0));
        let net_profit_yoy = round2(rng.gen_range(-10.0..30.0));
        let industry_factor = rng.gen_range(0.8..1.2);
        let industry_pe = round2(pe_hint.unwrap_or(pe_ttm) * industry_factor);

        FinancialMetrics {
            pe_ttm: Some(pe_ttm),
            pb: Some(pb),
            roe: Some(roe),
            net_profit_yoy: Some(net_profit_yoy),
            industry_pe: Some(industry_pe),
            synthetic_fields: Vec::new(),
        }
    }
}

impl Default for SyntheticSource {
    fn default() -> Self {
        Self::new(DEFAULT_SYNTHETIC_DAYS)
    }
}

#[async_trait]
impl PriceSource for SyntheticSource {
    async fn fetch_prices(
        &self,
        ticker: &str,
        _start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DataError> {
        self.generate_prices(ticker, end)
    }

    fn name(&self) -> &str {
        "synthetic"
    }
}

#[async_trait]
impl MetricsSource for SyntheticSource {
    async fn fetch_metrics(&self, ticker: &str) -> Result<FinancialMetrics, DataError> {
        let mut metrics = self.generate_metrics(ticker, None);
        metrics.synthetic_fields = MetricKind::ALL.to_vec();
        Ok(metrics)
    }

    fn name(&self) -> &str {
        "synthetic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn end() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    #[test]
    fn test_seed_is_stable() {
        // FNV-1a reference values
        assert_eq!(ticker_seed(""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(ticker_seed("a"), 0xaf63_dc4c_8601_ec8c);
        assert_eq!(ticker_seed(" 600519 "), ticker_seed("600519"));
    }

    #[test]
    fn test_same_ticker_same_prices() {
        let source = SyntheticSource::default();
        let a = source.generate_prices("600519", end()).unwrap();
        let b = source.generate_prices("600519", end()).unwrap();

        assert_eq!(a, b);
        assert!(a.synthetic);
    }

    #[test]
    fn test_different_tickers_differ() {
        let source = SyntheticSource::default();
        let a = source.generate_prices("600519", end()).unwrap();
        let b = source.generate_prices("000001", end()).unwrap();

        assert_ne!(a.closes(), b.closes());
    }

    #[test]
    fn test_price_shape() {
        let source = SyntheticSource::new(30);
        let series = source.generate_prices("AAPL", end()).unwrap();

        assert_eq!(series.len(), 30);
        assert!(series.is_ordered());
        assert_eq!(series.last().unwrap().date, end());
        assert_eq!(
            series.first().unwrap().date,
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
        );
        for bar in series.iter() {
            let close = bar.close.unwrap();
            assert!(bar.high.unwrap() >= close && bar.high.unwrap() <= close + 2.0);
            assert!(bar.low.unwrap() <= close && bar.low.unwrap() >= close - 2.0);
        }
    }

    #[test]
    fn test_metrics_ranges() {
        let metrics = SyntheticSource::default().generate_metrics("600519", None);

        let pe = metrics.pe_ttm.unwrap();
        assert!((10.0..=30.0).contains(&pe));
        assert!((1.0..=5.0).contains(&metrics.pb.unwrap()));
        assert!((-10.0..=30.0).contains(&metrics.net_profit_yoy.unwrap()));
        let industry = metrics.industry_pe.unwrap();
        assert!(industry >= (pe * 0.8) - 0.01 && industry <= (pe * 1.2) + 0.01);
        // Rounded to cents
        assert_eq!(round2(pe), pe);
    }

    #[test]
    fn test_metrics_deterministic() {
        let source = SyntheticSource::default();
        assert_eq!(
            source.generate_metrics("TSLA", None),
            source.generate_metrics("TSLA", None)
        );
    }

    #[tokio::test]
    async fn test_metrics_source_marks_all_synthetic() {
        let metrics = SyntheticSource::default().fetch_metrics("TSLA").await.unwrap();
        assert!(metrics.missing().is_empty());
        assert_eq!(metrics.synthetic_fields.len(), 5);
    }
}
