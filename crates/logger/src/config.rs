//! Logging configuration
//!
//! Declarative form of the facade settings, for hosts that configure
//! logging from a file.
//!
//! # Example
//!
//! ```toml
//! [log]
//! level = "info"
//! time_layout = "%Y-%m-%d %H:%M:%S%.3f"
//! with_caller = true
//! ```

use std::sync::Arc;

use serde::Deserialize;

use rotolog_sink::ByteSink;

use crate::level::Level;
use crate::logger::{Logger, DEFAULT_TIME_LAYOUT};

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Minimum emitted level (debug, info, warn, error, panic, none)
    /// Default: debug
    pub level: Level,

    /// strftime layout for line timestamps
    pub time_layout: String,

    /// Include `file:line` of the call site
    /// Default: true
    pub with_caller: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::default(),
            time_layout: DEFAULT_TIME_LAYOUT.into(),
            with_caller: true,
        }
    }
}

impl LogConfig {
    /// Build a logger over `sink` with these settings
    pub fn build(&self, sink: Arc<dyn ByteSink>) -> Logger {
        Logger::new(sink)
            .with_level(self.level)
            .with_time_layout(self.time_layout.clone())
            .with_caller(self.with_caller)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert_eq!(config.level, Level::Debug);
        assert_eq!(config.time_layout, DEFAULT_TIME_LAYOUT);
        assert!(config.with_caller);
    }

    #[test]
    fn test_deserialize_empty() {
        let config: LogConfig = toml::from_str("").unwrap();
        assert_eq!(config.level, Level::Debug);
    }

    #[test]
    fn test_deserialize_full() {
        let toml = r#"
level = "warn"
time_layout = "%H:%M:%S"
with_caller = false
"#;
        let config: LogConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.level, Level::Warn);
        assert_eq!(config.time_layout, "%H:%M:%S");
        assert!(!config.with_caller);
    }

    #[test]
    fn test_deserialize_invalid_level_fails() {
        let result: Result<LogConfig, _> = toml::from_str("level = \"loud\"");
        assert!(result.is_err());
    }
}
