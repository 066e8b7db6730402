//! Application configuration and constants.
//!
//! This module provides:
//! - Operational constants (timeouts, thresholds, limits)
//! - CLI option types and parsing

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{Cli, Command, ExportFormat, LogFormat, LogLevel};
