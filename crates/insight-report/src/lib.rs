//! Analysis report generation.
//!
//! Assembles prices, indicators, metrics and signals into an
//! [`AnalysisReport`] that renders as text, JSON or a multi-sheet XLSX
//! workbook.

mod overview;
mod report;
mod xlsx;

pub use overview::Overview;
pub use report::{format_change, format_value, AnalysisReport, NO_VALUE};
pub use xlsx::{XlsxWriter, DEFAULT_PRICE_ROWS, SHEET_NAMES};
