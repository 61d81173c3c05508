//! Eastmoney public quote API.

use async_trait::async_trait;
use chrono::NaiveDate;
use insight_core::error::DataError;
use insight_core::traits::{MetricsSource, PriceSource};
use insight_core::types::{FinancialMetrics, MetricKind, PriceBar, PriceSeries};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_KLINE_URL: &str = "https://push2his.eastmoney.com/api/qt/stock/kline/get";
pub const DEFAULT_QUOTE_URL: &str = "https://push2.eastmoney.com/api/qt/stock/get";

/// Eastmoney endpoint configuration.
#[derive(Debug, Clone)]
pub struct EastmoneyConfig {
    pub kline_url: String,
    pub quote_url: String,
    pub timeout: Duration,
}

impl Default for EastmoneyConfig {
    fn default() -> Self {
        Self {
            kline_url: DEFAULT_KLINE_URL.to_string(),
            quote_url: DEFAULT_QUOTE_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Deserialize)]
struct KlineResponse {
    data: Option<KlineData>,
}

#[derive(Debug, Deserialize)]
struct KlineData {
    #[serde(default)]
    klines: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    data: Option<serde_json::Map<String, Value>>,
}

/// Eastmoney daily kline and valuation client.
pub struct EastmoneySource {
    config: EastmoneyConfig,
    client: Client,
}

impl EastmoneySource {
    pub fn new(config: EastmoneyConfig) -> Result<Self, DataError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DataError::ConnectionError(e.to_string()))?;
        Ok(Self { config, client })
    }

    /// Map a ticker to Eastmoney's `market.code` security id.
    ///
    /// Six-digit A-share codes starting with 5, 6 or 9 trade in Shanghai
    /// (market 1), other six-digit codes in Shenzhen (market 0). Five-digit
    /// codes are Hong Kong (116); anything else is treated as a US ticker
    /// (105). Ids that already contain a market prefix pass through.
    pub fn secid(ticker: &str) -> String {
        let ticker = ticker.trim();
        if ticker.contains('.') {
            return ticker.to_string();
        }
        let all_digits = ticker.chars().all(|c| c.is_ascii_digit());
        match (all_digits, ticker.len()) {
            (true, 6) if ticker.starts_with(['5', '6', '9']) => format!("1.{}", ticker),
            (true, 6) => format!("0.{}", ticker),
            (true, 5) => format!("116.{}", ticker),
            _ => format!("105.{}", ticker.to_uppercase()),
        }
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<T, DataError> {
        let resp = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| DataError::ConnectionError(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(DataError::ApiError(format!("{}: {}", status, text)));
        }

        resp.json()
            .await
            .map_err(|e| DataError::ParseError(e.to_string()))
    }
}

/// Parse one `date,open,close,high,low,...` kline record.
fn parse_kline(line: &str) -> Result<PriceBar, DataError> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() < 5 {
        return Err(DataError::ParseError(format!("Short kline record: {}", line)));
    }
    let date = NaiveDate::parse_from_str(fields[0], "%Y-%m-%d")
        .map_err(|e| DataError::ParseError(format!("{}: {}", fields[0], e)))?;
    let number = |s: &str| s.trim().parse::<f64>().ok();

    Ok(PriceBar::from_options(
        date,
        number(fields[3]),
        number(fields[4]),
        number(fields[2]),
    ))
}

/// Numeric quote field; Eastmoney reports unavailable values as `"-"`.
fn quote_number(data: &serde_json::Map<String, Value>, key: &str) -> Option<f64> {
    match data.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

#[async_trait]
impl PriceSource for EastmoneySource {
    async fn fetch_prices(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DataError> {
        let params = [
            ("secid", Self::secid(ticker)),
            ("fields1", "f1,f2,f3,f4,f5,f6".to_string()),
            ("fields2", "f51,f52,f53,f54,f55,f56".to_string()),
            ("klt", "101".to_string()),
            ("fqt", "1".to_string()),
            ("beg", start.format("%Y%m%d").to_string()),
            ("end", end.format("%Y%m%d").to_string()),
        ];

        let response: KlineResponse = self.get_json(&self.config.kline_url, &params).await?;
        let data = response
            .data
            .ok_or_else(|| DataError::SymbolNotFound(ticker.to_string()))?;

        let mut bars = data
            .klines
            .iter()
            .map(|line| parse_kline(line))
            .collect::<Result<Vec<_>, _>>()?;
        bars.sort_by_key(|b| b.date);

        if bars.is_empty() {
            return Err(DataError::NoDataAvailable);
        }

        info!(ticker, bars = bars.len(), "Fetched daily prices from Eastmoney");
        Ok(PriceSeries::new(ticker, bars))
    }

    fn name(&self) -> &str {
        "eastmoney"
    }
}

#[async_trait]
impl MetricsSource for EastmoneySource {
    async fn fetch_metrics(&self, ticker: &str) -> Result<FinancialMetrics, DataError> {
        let params = [
            ("secid", Self::secid(ticker)),
            ("fields", "f57,f58,f162,f167,f173,f185".to_string()),
        ];

        let response: QuoteResponse = self.get_json(&self.config.quote_url, &params).await?;
        let data = response
            .data
            .ok_or_else(|| DataError::SymbolNotFound(ticker.to_string()))?;

        let mut metrics = FinancialMetrics::default();
        // PE and PB are reported multiplied by 100
        metrics.set(MetricKind::PeTtm, quote_number(&data, "f162").map(|v| v / 100.0));
        metrics.set(MetricKind::Pb, quote_number(&data, "f167").map(|v| v / 100.0));
        metrics.set(MetricKind::Roe, quote_number(&data, "f173"));
        metrics.set(MetricKind::NetProfitYoy, quote_number(&data, "f185"));

        debug!(ticker, missing = ?metrics.missing(), "Fetched metrics from Eastmoney");
        Ok(metrics)
    }

    fn name(&self) -> &str {
        "eastmoney"
    }
}
