//! Global logger setup (`log` facade, `env_logger` backend)

use std::sync::Once;

use crate::config::EngineConfig;

/// Engine messages at `info`, everything else (SDL glue, dependencies) at `warn`
pub const DEFAULT_FILTER: &str = "warn,pixelforge=info";

/// Logger configuration
///
/// `env_filter` uses the `env_logger` filter syntax, e.g. `"info"` or
/// `"pixelforge::input=trace"`. When unset, `RUST_LOG` is used, then
/// [`DEFAULT_FILTER`].
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
    /// Millisecond timestamps, handy when reading per-frame traces
    pub timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
            timestamps: true,
        }
    }
}

impl LoggingConfig {
    pub fn with_filter(filter: impl Into<String>) -> Self {
        Self {
            env_filter: Some(filter.into()),
            ..Self::default()
        }
    }

    /// Logging as requested by an engine config's `log_filter`
    pub fn from_engine(config: &EngineConfig) -> Self {
        Self {
            env_filter: config.log_filter.clone(),
            ..Self::default()
        }
    }

    /// Filter string actually installed given the value of `RUST_LOG`
    pub fn resolve_filter(&self, rust_log: Option<String>) -> String {
        self.env_filter
            .clone()
            .or(rust_log)
            .filter(|f| !f.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_FILTER.to_string())
    }
}

static INIT: Once = Once::new();

/// Install the global logger once; later calls are ignored
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = config.resolve_filter(std::env::var("RUST_LOG").ok());

        let mut builder = env_logger::Builder::new();
        builder.parse_filters(&filter);
        builder.write_style(config.write_style);
        if config.timestamps {
            builder.format_timestamp_millis();
        } else {
            builder.format_timestamp(None);
        }

        // Another logger (a test harness, an embedding app) may already be installed
        if builder.try_init().is_ok() {
            log::debug!("logging initialized with filter {:?}", filter);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_precedence() {
        let explicit = LoggingConfig::with_filter("pixelforge::input=trace");
        assert_eq!(
            explicit.resolve_filter(Some("error".into())),
            "pixelforge::input=trace"
        );

        let default = LoggingConfig::default();
        assert_eq!(default.resolve_filter(Some("debug".into())), "debug");
        assert_eq!(default.resolve_filter(None), DEFAULT_FILTER);
        assert_eq!(default.resolve_filter(Some("  ".into())), DEFAULT_FILTER);
    }

    #[test]
    fn test_from_engine_config() {
        let config = EngineConfig {
            log_filter: Some("pixelforge=debug".into()),
            ..EngineConfig::default()
        };
        let logging = LoggingConfig::from_engine(&config);
        assert_eq!(logging.resolve_filter(None), "pixelforge=debug");
        assert!(LoggingConfig::from_engine(&EngineConfig::default())
            .env_filter
            .is_none());
    }

    #[test]
    fn test_init_is_idempotent() {
        init_logging(LoggingConfig::with_filter("warn"));
        init_logging(LoggingConfig::default());
        log::warn!("still alive");
    }
}
