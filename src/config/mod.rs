//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (paths, download limits, sentinels)
//! - CLI option types and parsing
//! - The library `Config` struct

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{Cli, Command, Config, DatabasePaths, LogFormat, LogLevel};
