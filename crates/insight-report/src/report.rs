//! Single-stock analysis report.

use chrono::{DateTime, Utc};
use insight_core::types::{FinancialMetrics, IndicatorSeries, MetricKind, PriceSeries, Signal};
use serde::{Deserialize, Serialize};

use crate::Overview;

/// Placeholder rendered for a missing value.
pub const NO_VALUE: &str = "—";

const RULE: &str = "═══════════════════════════════════════════════════════════\n";
const SECTION: &str = "───────────────────────────────────────────────────────────\n";

/// Complete analysis of one ticker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Ticker as entered
    pub ticker: String,
    /// When the report was assembled
    pub generated_at: DateTime<Utc>,
    /// Whether the price history was generated rather than fetched
    pub synthetic_prices: bool,
    pub prices: PriceSeries,
    pub indicators: IndicatorSeries,
    pub metrics: FinancialMetrics,
    pub overview: Overview,
    pub signals: Vec<Signal>,
}

impl AnalysisReport {
    pub fn new(
        prices: PriceSeries,
        indicators: IndicatorSeries,
        metrics: FinancialMetrics,
        signals: Vec<Signal>,
    ) -> Self {
        Self {
            ticker: prices.ticker.clone(),
            generated_at: Utc::now(),
            synthetic_prices: prices.synthetic,
            overview: Overview::from_prices(&prices),
            prices,
            indicators,
            metrics,
            signals,
        }
    }

    /// Signal text, or the no-signal placeholder.
    pub fn signal_text(&self) -> String {
        Signal::describe(&self.signals)
    }

    /// `{ticker}_report.xlsx`
    pub fn default_file_name(&self) -> String {
        format!("{}_report.xlsx", self.ticker.trim())
    }

    /// Generate a text summary.
    pub fn summary(&self) -> String {
        let mut s = String::new();

        s.push_str(RULE);
        s.push_str("                    STOCK ANALYSIS REPORT                   \n");
        s.push_str(RULE);
        s.push('\n');

        s.push_str("OVERVIEW\n");
        s.push_str(SECTION);
        s.push_str(&format!("  Ticker:              {}\n", self.ticker));
        s.push_str(&format!(
            "  Price Data:          {}\n",
            if self.synthetic_prices {
                "synthetic (source unavailable)"
            } else {
                "fetched"
            }
        ));
        if let (Some(first), Some(last)) = (self.prices.first(), self.prices.last()) {
            s.push_str(&format!(
                "  Period:              {} to {} ({} bars)\n",
                first.date,
                last.date,
                self.prices.len()
            ));
        }
        s.push_str(&format!(
            "  Latest Close:        {}\n",
            format_value(self.overview.latest_close)
        ));
        s.push_str(&format!(
            "  1M Change:           {}\n",
            format_change(self.overview.change_1m_pct)
        ));
        s.push_str(&format!(
            "  3M Change:           {}\n",
            format_change(self.overview.change_3m_pct)
        ));
        s.push_str(&format!(
            "  Period Change:       {}\n",
            format_change(self.overview.change_total_pct)
        ));
        s.push('\n');

        s.push_str("VALUATION\n");
        s.push_str(SECTION);
        for kind in MetricKind::ALL {
            let marker = if self.metrics.is_synthetic(kind) {
                " *"
            } else {
                ""
            };
            s.push_str(&format!(
                "  {:<21}{}{}\n",
                format!("{}:", kind.label()),
                self.metrics.display(kind),
                marker
            ));
        }
        if !self.metrics.synthetic_fields.is_empty() {
            s.push_str("  (* synthetic value)\n");
        }
        s.push('\n');

        s.push_str("TECHNICALS\n");
        s.push_str(SECTION);
        if let Some(row) = self.indicators.last() {
            s.push_str(&format!(
                "  DIF / DEA / MACD:    {} / {} / {}\n",
                format_value(row.dif),
                format_value(row.dea),
                format_value(row.macd)
            ));
            s.push_str(&format!(
                "  K / D / J:           {} / {} / {}\n",
                format_value(row.k),
                format_value(row.d),
                format_value(row.j)
            ));
        } else {
            s.push_str("  No indicator data\n");
        }
        s.push('\n');

        s.push_str("SIGNALS\n");
        s.push_str(SECTION);
        s.push_str(&format!("  {}\n", self.signal_text()));
        s.push('\n');

        s.push_str(RULE);

        s
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Two decimals, or [`NO_VALUE`] when missing.
pub fn format_value(value: Option<f64>) -> String {
    value.map_or_else(|| NO_VALUE.to_string(), |v| format!("{:.2}", v))
}

/// Signed percentage, or [`NO_VALUE`] when missing.
pub fn format_change(value: Option<f64>) -> String {
    value.map_or_else(|| NO_VALUE.to_string(), |v| format!("{:+.2}%", v))
}
