//! Telemetry module for logging and metrics.
//!
//! Provides:
//! - Logging configuration and initialization
//! - Send counters

mod logging;
mod metrics;

pub use logging::{init_logging, is_valid_level, parse_level, LogConfig, LogFormat};
pub use metrics::{Counter, SendStats, StatsSnapshot};
