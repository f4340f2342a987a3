//! Configuration validation

use super::Config;
use crate::telemetry::is_valid_level;
use tracing::{error, warn};

/// Intervals below this flood the target faster than a probe needs
const MIN_SANE_INTERVAL_MS: u64 = 10;

#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    pub fn error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn log_diagnostics(&self) {
        for warning in &self.warnings {
            warn!("{}", warning);
        }
        for err in &self.errors {
            error!("{}", err);
        }
    }
}

/// Validate configuration and return warnings/errors
pub fn validate(config: &Config) -> ValidationResult {
    let mut result = ValidationResult::new();

    validate_target(config, &mut result);
    validate_sender(config, &mut result);
    validate_logging(config, &mut result);

    result
}

fn validate_target(config: &Config, result: &mut ValidationResult) {
    let host_missing = config
        .target
        .host
        .as_deref()
        .map_or(true, |h| h.trim().is_empty());
    let port_missing = config.target.port.map_or(true, |p| p == 0);

    if host_missing || port_missing {
        result.error("host and/or port undefined");
    }
}

fn validate_sender(config: &Config, result: &mut ValidationResult) {
    let interval = config.sender.interval_ms;
    if interval == 0 {
        result.error("sender.interval_ms: must be greater than 0");
    } else if interval < MIN_SANE_INTERVAL_MS {
        result.warn(format!(
            "sender.interval_ms: {} ms is very short, target may be flooded",
            interval
        ));
    }

    if config.sender.count == Some(0) {
        result.warn("sender.count: 0, no packets will be sent");
    }
}

fn validate_logging(config: &Config, result: &mut ValidationResult) {
    if !is_valid_level(&config.logging.level) {
        result.warn(format!(
            "logging.level: unknown level '{}', using info",
            config.logging.level
        ));
    }
}
