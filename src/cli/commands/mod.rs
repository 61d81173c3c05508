//! CLI command implementations.

pub mod analyze;
pub mod show_config;
pub mod validate;
