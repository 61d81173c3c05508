//! Valuation and financial ratios.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named financial ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Price to earnings, trailing twelve months
    PeTtm,
    /// Price to book
    Pb,
    /// Weighted return on equity (%)
    Roe,
    /// Year-over-year net profit growth (%)
    NetProfitYoy,
    /// Industry average price to earnings
    IndustryPe,
}

impl MetricKind {
    /// All metrics in display order.
    pub const ALL: [MetricKind; 5] = [
        MetricKind::PeTtm,
        MetricKind::Pb,
        MetricKind::Roe,
        MetricKind::NetProfitYoy,
        MetricKind::IndustryPe,
    ];

    /// Short display label.
    pub fn label(&self) -> &'static str {
        match self {
            MetricKind::PeTtm => "PE (TTM)",
            MetricKind::Pb => "PB",
            MetricKind::Roe => "ROE (%)",
            MetricKind::NetProfitYoy => "Net profit YoY (%)",
            MetricKind::IndustryPe => "Industry avg PE",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Financial ratios for one ticker. Every value may be absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FinancialMetrics {
    pub pe_ttm: Option<f64>,
    pub pb: Option<f64>,
    pub roe: Option<f64>,
    pub net_profit_yoy: Option<f64>,
    pub industry_pe: Option<f64>,
    /// Metrics that were filled with generated values
    #[serde(default)]
    pub synthetic_fields: Vec<MetricKind>,
}

impl FinancialMetrics {
    /// Get a metric value.
    pub fn get(&self, kind: MetricKind) -> Option<f64> {
        match kind {
            MetricKind::PeTtm => self.pe_ttm,
            MetricKind::Pb => self.pb,
            MetricKind::Roe => self.roe,
            MetricKind::NetProfitYoy => self.net_profit_yoy,
            MetricKind::IndustryPe => self.industry_pe,
        }
    }

    /// Set a metric value. Non-finite values are stored as missing.
    pub fn set(&mut self, kind: MetricKind, value: Option<f64>) {
        let value = value.filter(|v| v.is_finite());
        let slot = match kind {
            MetricKind::PeTtm => &mut self.pe_ttm,
            MetricKind::Pb => &mut self.pb,
            MetricKind::Roe => &mut self.roe,
            MetricKind::NetProfitYoy => &mut self.net_profit_yoy,
            MetricKind::IndustryPe => &mut self.industry_pe,
        };
        *slot = value;
    }

    /// Metrics that are currently absent.
    pub fn missing(&self) -> Vec<MetricKind> {
        MetricKind::ALL
            .into_iter()
            .filter(|k| self.get(*k).is_none())
            .collect()
    }

    /// Fill every absent metric from `other`, recording which were filled.
    pub fn fill_missing_from(&mut self, other: &FinancialMetrics) {
        for kind in self.missing() {
            if let Some(value) = other.get(kind) {
                self.set(kind, Some(value));
                self.synthetic_fields.push(kind);
            }
        }
    }

    /// Whether a metric was generated rather than fetched.
    pub fn is_synthetic(&self, kind: MetricKind) -> bool {
        self.synthetic_fields.contains(&kind)
    }

    /// Display value, with a dash placeholder for missing metrics.
    pub fn display(&self, kind: MetricKind) -> String {
        match self.get(kind) {
            Some(v) => format!("{:.2}", v),
            None => "—".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_metrics() {
        let metrics = FinancialMetrics {
            pe_ttm: Some(25.1),
            roe: Some(0.0),
            ..Default::default()
        };

        assert_eq!(
            metrics.missing(),
            vec![MetricKind::Pb, MetricKind::NetProfitYoy, MetricKind::IndustryPe]
        );
        assert_eq!(metrics.display(MetricKind::Pb), "—");
        assert_eq!(metrics.display(MetricKind::Roe), "0.00");
    }

    #[test]
    fn test_fill_missing_keeps_fetched_values() {
        let mut fetched = FinancialMetrics {
            pe_ttm: Some(25.0),
            ..Default::default()
        };
        let generated = FinancialMetrics {
            pe_ttm: Some(12.0),
            pb: Some(3.5),
            roe: Some(15.0),
            net_profit_yoy: Some(-2.0),
            industry_pe: Some(11.0),
            synthetic_fields: vec![],
        };

        fetched.fill_missing_from(&generated);

        assert_eq!(fetched.pe_ttm, Some(25.0));
        assert_eq!(fetched.pb, Some(3.5));
        assert!(fetched.missing().is_empty());
        assert!(!fetched.is_synthetic(MetricKind::PeTtm));
        assert!(fetched.is_synthetic(MetricKind::IndustryPe));
    }

    #[test]
    fn test_set_rejects_nan() {
        let mut metrics = FinancialMetrics::default();
        metrics.set(MetricKind::Pb, Some(f64::NAN));
        assert_eq!(metrics.pb, None);
    }
}
