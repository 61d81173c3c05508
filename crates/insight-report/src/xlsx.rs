//! XLSX export.

use std::path::Path;

use insight_core::error::ReportError;
use insight_core::types::{MetricKind, PriceBar};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use tracing::info;

use crate::AnalysisReport;

/// Price rows exported by default (about one trading year).
pub const DEFAULT_PRICE_ROWS: usize = 250;

/// Worksheets in export order.
pub const SHEET_NAMES: [&str; 5] = ["Price", "Valuation", "MACD", "KDJ", "Signals"];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Writes an [`AnalysisReport`] as a multi-sheet workbook.
///
/// Missing values are left as blank cells.
#[derive(Debug, Clone, Copy)]
pub struct XlsxWriter {
    price_rows: usize,
}

impl Default for XlsxWriter {
    fn default() -> Self {
        Self::new(DEFAULT_PRICE_ROWS)
    }
}

impl XlsxWriter {
    pub fn new(price_rows: usize) -> Self {
        Self {
            price_rows: price_rows.max(1),
        }
    }

    pub fn price_rows(&self) -> usize {
        self.price_rows
    }

    /// The trailing bars exported to the Price sheet.
    pub fn price_window<'a>(&self, report: &'a AnalysisReport) -> &'a [PriceBar] {
        report.prices.last_n(self.price_rows)
    }

    pub fn write(&self, report: &AnalysisReport, path: &Path) -> Result<(), ReportError> {
        let mut workbook = self.populate(report).map_err(spreadsheet)?;
        workbook.save(path).map_err(spreadsheet)?;
        info!(ticker = %report.ticker, path = %path.display(), "Exported workbook");
        Ok(())
    }

    fn populate(&self, report: &AnalysisReport) -> Result<Workbook, XlsxError> {
        let header = Format::new().set_bold();
        let number = Format::new().set_num_format("0.00");
        let mut workbook = Workbook::new();

        let sheet = named_sheet(&mut workbook, SHEET_NAMES[0])?;
        write_header(sheet, &["Date", "High", "Low", "Close"], &header)?;
        for (i, bar) in self.price_window(report).iter().enumerate() {
            let row = i as u32 + 1;
            sheet.write_string(row, 0, bar.date.format(DATE_FORMAT).to_string())?;
            write_optional(sheet, row, 1, bar.high, &number)?;
            write_optional(sheet, row, 2, bar.low, &number)?;
            write_optional(sheet, row, 3, bar.close, &number)?;
        }

        let sheet = named_sheet(&mut workbook, SHEET_NAMES[1])?;
        write_header(sheet, &["Metric", "Value", "Source"], &header)?;
        for (i, kind) in MetricKind::ALL.iter().enumerate() {
            let row = i as u32 + 1;
            let value = report.metrics.get(*kind);
            sheet.write_string(row, 0, kind.label())?;
            write_optional(sheet, row, 1, value, &number)?;
            if value.is_some() {
                let source = if report.metrics.is_synthetic(*kind) {
                    "synthetic"
                } else {
                    "fetched"
                };
                sheet.write_string(row, 2, source)?;
            }
        }
        sheet.set_column_width(0, 22)?;

        let sheet = named_sheet(&mut workbook, SHEET_NAMES[2])?;
        write_header(sheet, &["Date", "DIF", "DEA", "MACD"], &header)?;
        for (i, ind) in report.indicators.iter().enumerate() {
            let row = i as u32 + 1;
            write_date(sheet, row, ind.date)?;
            write_optional(sheet, row, 1, ind.dif, &number)?;
            write_optional(sheet, row, 2, ind.dea, &number)?;
            write_optional(sheet, row, 3, ind.macd, &number)?;
        }

        let sheet = named_sheet(&mut workbook, SHEET_NAMES[3])?;
        write_header(sheet, &["Date", "RSV", "K", "D", "J"], &header)?;
        for (i, ind) in report.indicators.iter().enumerate() {
            let row = i as u32 + 1;
            write_date(sheet, row, ind.date)?;
            write_optional(sheet, row, 1, ind.rsv, &number)?;
            write_optional(sheet, row, 2, ind.k, &number)?;
            write_optional(sheet, row, 3, ind.d, &number)?;
            write_optional(sheet, row, 4, ind.j, &number)?;
        }

        let sheet = named_sheet(&mut workbook, SHEET_NAMES[4])?;
        write_header(sheet, &["Ticker", "Generated", "Signals"], &header)?;
        sheet.write_string(1, 0, &report.ticker)?;
        sheet.write_string(1, 1, report.generated_at.to_rfc3339())?;
        sheet.write_string(1, 2, report.signal_text())?;
        sheet.set_column_width(1, 28)?;
        sheet.set_column_width(2, 36)?;

        Ok(workbook)
    }
}

impl AnalysisReport {
    /// Export the default workbook layout to `path`.
    pub fn write_xlsx(&self, path: &Path) -> Result<(), ReportError> {
        XlsxWriter::default().write(self, path)
    }
}

fn spreadsheet(e: XlsxError) -> ReportError {
    ReportError::Spreadsheet(e.to_string())
}

fn named_sheet<'a>(workbook: &'a mut Workbook, name: &str) -> Result<&'a mut Worksheet, XlsxError> {
    let sheet = workbook.add_worksheet();
    sheet.set_name(name)?;
    Ok(sheet)
}

fn write_header(sheet: &mut Worksheet, titles: &[&str], format: &Format) -> Result<(), XlsxError> {
    for (col, title) in titles.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, format)?;
    }
    sheet.set_column_width(0, 12)?;
    Ok(())
}

fn write_date(
    sheet: &mut Worksheet,
    row: u32,
    date: Option<chrono::NaiveDate>,
) -> Result<(), XlsxError> {
    if let Some(date) = date {
        sheet.write_string(row, 0, date.format(DATE_FORMAT).to_string())?;
    }
    Ok(())
}

fn write_optional(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: Option<f64>,
    format: &Format,
) -> Result<(), XlsxError> {
    if let Some(v) = value {
        sheet.write_number_with_format(row, col, v, format)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, NaiveDate};
    use insight_core::types::{FinancialMetrics, PriceSeries};
    use insight_indicators::compute_indicators;
    use insight_signals::derive_signals;
    use std::io::Read;

    fn report(len: usize) -> AnalysisReport {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let bars = (0..len)
            .map(|i| {
                let close = 100.0 + (i as f64 * 0.3).sin() * 5.0;
                PriceBar::new(start + Days::new(i as u64), close + 1.0, close - 1.0, close)
            })
            .collect();
        let prices = PriceSeries::new("000001", bars);
        let indicators = compute_indicators(&prices);
        let signals = derive_signals(&indicators);
        AnalysisReport::new(prices, indicators, FinancialMetrics::default(), signals)
    }

    fn is_zip(path: &Path) -> bool {
        let mut magic = [0u8; 2];
        std::fs::File::open(path)
            .and_then(|mut f| f.read_exact(&mut magic))
            .is_ok()
            && &magic == b"PK"
    }

    #[test]
    fn test_price_window() {
        let report = report(300);

        let window = XlsxWriter::default().price_window(&report);
        assert_eq!(window.len(), DEFAULT_PRICE_ROWS);
        assert_eq!(window.last(), report.prices.last());

        assert_eq!(XlsxWriter::new(500).price_window(&report).len(), 300);
        assert_eq!(XlsxWriter::new(0).price_rows(), 1);
    }

    #[test]
    fn test_write_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let report = report(40);
        let path = dir.path().join(report.default_file_name());

        report.write_xlsx(&path).unwrap();

        assert!(is_zip(&path));
    }

    #[test]
    fn test_write_empty_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.xlsx");

        report(0).write_xlsx(&path).unwrap();

        assert!(is_zip(&path));
    }

    #[test]
    fn test_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("report.xlsx");

        let result = report(5).write_xlsx(&path);
        assert!(matches!(result, Err(ReportError::Spreadsheet(_))));
    }
}
