//! Configuration management
//!
//! An optional TOML file supplies defaults, command-line flags override it,
//! and validation decides whether the result is runnable.

mod types;
mod validation;

pub use types::*;
pub use validation::{validate, ValidationResult};

use crate::{Error, Result};
use std::path::Path;
use std::time::Duration;

/// Load configuration from a TOML file
pub fn load<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read {}: {}", path.display(), e)))?;
    parse(&content)
}

/// Parse configuration from TOML text
pub fn parse(content: &str) -> Result<Config> {
    toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
}

/// Validate `config` and turn it into run settings.
///
/// Diagnostics are logged; any error aborts with [`Error::Config`].
pub fn resolve(config: &Config) -> Result<Settings> {
    let validation = validate(config);
    validation.log_diagnostics();

    if validation.has_errors() {
        return Err(Error::Config(validation.errors.join("; ")));
    }

    match (&config.target.host, config.target.port) {
        (Some(host), Some(port)) => Ok(Settings {
            host: host.trim().to_string(),
            port,
            interval: Duration::from_millis(config.sender.interval_ms),
            count: config.sender.count,
        }),
        _ => Err(Error::Config("host and/or port undefined".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::LogFormat;

    const FULL: &str = r#"
[target]
host = "scanme.example"
port = 8080

[sender]
interval_ms = 500
count = 4

[logging]
level = "debug"
format = "compact"
"#;

    #[test]
    fn test_parse_full() {
        let config = parse(FULL).unwrap();
        assert_eq!(config.target.host.as_deref(), Some("scanme.example"));
        assert_eq!(config.target.port, Some(8080));
        assert_eq!(config.sender.interval_ms, 500);
        assert_eq!(config.sender.count, Some(4));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Compact);
    }

    #[test]
    fn test_parse_empty_uses_defaults() {
        let config = parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.sender.interval_ms, DEFAULT_INTERVAL_MS);
        assert_eq!(config.sender.count, None);
    }

    #[test]
    fn test_parse_rejects_unknown_field() {
        let err = parse("[target]\nhots = \"x\"\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_parse_rejects_out_of_range_port() {
        assert!(parse("[target]\nport = 70000\n").is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = load("/nonexistent/pktcrafter.toml").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_overrides_win() {
        let mut config = parse(FULL).unwrap();
        config.apply(Overrides {
            host: Some("192.0.2.1".to_string()),
            interval_ms: Some(100),
            log_format: Some(LogFormat::Json),
            ..Default::default()
        });

        assert_eq!(config.target.host.as_deref(), Some("192.0.2.1"));
        assert_eq!(config.target.port, Some(8080));
        assert_eq!(config.sender.interval_ms, 100);
        assert_eq!(config.sender.count, Some(4));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_resolve() {
        let settings = resolve(&parse(FULL).unwrap()).unwrap();
        assert_eq!(
            settings,
            Settings {
                host: "scanme.example".to_string(),
                port: 8080,
                interval: Duration::from_millis(500),
                count: Some(4),
            }
        );
    }

    #[test]
    fn test_resolve_without_target_fails() {
        let err = resolve(&Config::default()).unwrap_err();
        assert!(err.to_string().contains("host and/or port undefined"));
    }
}
