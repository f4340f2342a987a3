//! Configuration types

use crate::telemetry::{LogConfig, LogFormat};
use serde::Deserialize;
use std::time::Duration;

/// Interval between packets when neither file nor CLI sets one
pub const DEFAULT_INTERVAL_MS: u64 = 3000;

/// Configuration file (TOML)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub target: TargetConfig,
    pub sender: SenderConfig,
    pub logging: LogConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TargetConfig {
    /// Host name or IPv4 address
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SenderConfig {
    pub interval_ms: u64,
    /// Stop after this many packets; unlimited if absent
    pub count: Option<u64>,
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_INTERVAL_MS,
            count: None,
        }
    }
}

/// Command-line values that take precedence over the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub interval_ms: Option<u64>,
    pub count: Option<u64>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

impl Config {
    /// Merge CLI values over file values
    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(host) = overrides.host {
            self.target.host = Some(host);
        }
        if let Some(port) = overrides.port {
            self.target.port = Some(port);
        }
        if let Some(interval_ms) = overrides.interval_ms {
            self.sender.interval_ms = interval_ms;
        }
        if let Some(count) = overrides.count {
            self.sender.count = Some(count);
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if let Some(format) = overrides.log_format {
            self.logging.format = format;
        }
    }
}

/// Fully resolved run settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub interval: Duration,
    pub count: Option<u64>,
}
