//! Indicator output aligned with a price series.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// MACD and KDJ values for one bar. `None` marks a value that is undefined
/// at this position, which is distinct from a legitimate zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IndicatorRow {
    /// Date of the source bar
    pub date: Option<NaiveDate>,
    /// Short EMA minus long EMA
    pub dif: Option<f64>,
    /// Signal line (EMA of DIF)
    pub dea: Option<f64>,
    /// Histogram, 2 * (DIF - DEA)
    pub macd: Option<f64>,
    /// Raw stochastic value
    pub rsv: Option<f64>,
    /// Smoothed %K
    pub k: Option<f64>,
    /// Smoothed %D
    pub d: Option<f64>,
    /// %J = 3K - 2D
    pub j: Option<f64>,
}

/// Indicator rows, one per input bar, in input order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IndicatorSeries {
    rows: Vec<IndicatorRow>,
}

impl IndicatorSeries {
    /// Wrap computed rows.
    pub fn new(rows: Vec<IndicatorRow>) -> Self {
        Self { rows }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[IndicatorRow] {
        &self.rows
    }

    /// Get the latest row.
    pub fn last(&self) -> Option<&IndicatorRow> {
        self.rows.last()
    }

    /// Get a row by index (0 = oldest).
    pub fn get(&self, index: usize) -> Option<&IndicatorRow> {
        self.rows.get(index)
    }

    /// Get the last N rows.
    pub fn last_n(&self, n: usize) -> &[IndicatorRow] {
        let start = self.rows.len().saturating_sub(n);
        &self.rows[start..]
    }

    pub fn difs(&self) -> Vec<Option<f64>> {
        self.rows.iter().map(|r| r.dif).collect()
    }

    pub fn deas(&self) -> Vec<Option<f64>> {
        self.rows.iter().map(|r| r.dea).collect()
    }

    pub fn macds(&self) -> Vec<Option<f64>> {
        self.rows.iter().map(|r| r.macd).collect()
    }

    pub fn ks(&self) -> Vec<Option<f64>> {
        self.rows.iter().map(|r| r.k).collect()
    }

    pub fn ds(&self) -> Vec<Option<f64>> {
        self.rows.iter().map(|r| r.d).collect()
    }

    pub fn js(&self) -> Vec<Option<f64>> {
        self.rows.iter().map(|r| r.j).collect()
    }

    /// Index of the first row with a defined %K, if any.
    pub fn first_kdj_index(&self) -> Option<usize> {
        self.rows.iter().position(|r| r.k.is_some())
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndicatorRow> {
        self.rows.iter()
    }
}

impl FromIterator<IndicatorRow> for IndicatorSeries {
    fn from_iter<T: IntoIterator<Item = IndicatorRow>>(iter: T) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_kdj_index() {
        let series: IndicatorSeries = (0..4)
            .map(|i| IndicatorRow {
                k: (i >= 2).then_some(50.0),
                ..Default::default()
            })
            .collect();

        assert_eq!(series.len(), 4);
        assert_eq!(series.first_kdj_index(), Some(2));
        assert_eq!(series.ks(), vec![None, None, Some(50.0), Some(50.0)]);
    }

    #[test]
    fn test_empty_series() {
        let series = IndicatorSeries::default();
        assert!(series.is_empty());
        assert!(series.last().is_none());
        assert!(series.last_n(3).is_empty());
        assert_eq!(series.first_kdj_index(), None);
    }
}
