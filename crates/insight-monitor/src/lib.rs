//! Logging and the TUI analysis dashboard.

mod charts;
mod dashboard;
mod logging;

pub use charts::{axis_bounds, points};
pub use dashboard::{Dashboard, Tab};
pub use logging::setup_logging;
