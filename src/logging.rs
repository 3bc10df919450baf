//! Structured logging setup.
//!
//! The library only emits `tracing` events; hosts that have no subscriber of their
//! own can install one here. Configuration comes from the environment:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `XQREST_LOG_LEVEL` | `info` | trace/debug/info/warn/error |
//! | `XQREST_LOG_FORMAT` | `json` | json or pretty |
//! | `XQREST_LOG_ASYNC` | `false` | buffered non-blocking stdout writer |
//! | `XQREST_LOG_TARGET_FILTER` | unset | extra comma-separated filter directives |
//! | `XQREST_LOG_INCLUDE_LOCATION` | `false` | include file and line |
//!
//! `RUST_LOG`, when set, takes precedence over `XQREST_LOG_LEVEL`.

use anyhow::{Context, Result};
use std::env;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Log format: JSON for production, pretty-print for development
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Json,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// trace/debug/info/warn/error
    pub log_level: String,
    pub format: LogFormat,
    pub async_logging: bool,
    /// Comma-separated `EnvFilter` directives
    pub target_filter: Option<String>,
    /// Include file:line location (dev only)
    pub include_location: bool,
}

fn env_flag(name: &str) -> Option<bool> {
    env::var(name).ok().and_then(|s| s.parse().ok())
}

impl LogConfig {
    /// Parse configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            log_level: env::var("XQREST_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: LogFormat::parse(
                &env::var("XQREST_LOG_FORMAT").unwrap_or_else(|_| "json".to_string()),
            ),
            async_logging: env_flag("XQREST_LOG_ASYNC").unwrap_or(false),
            target_filter: env::var("XQREST_LOG_TARGET_FILTER").ok(),
            include_location: env_flag("XQREST_LOG_INCLUDE_LOCATION").unwrap_or(false),
        }
    }

    pub fn default_dev() -> Self {
        Self {
            log_level: "debug".to_string(),
            format: LogFormat::Pretty,
            async_logging: false,
            target_filter: None,
            include_location: true,
        }
    }

    pub fn default_prod() -> Self {
        Self {
            log_level: "info".to_string(),
            format: LogFormat::Json,
            async_logging: true,
            target_filter: None,
            include_location: false,
        }
    }

    pub fn level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }

    /// `RUST_LOG` (or the configured level) plus any valid target directives.
    pub fn env_filter(&self) -> EnvFilter {
        let mut filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level().as_str()));
        if let Some(targets) = &self.target_filter {
            for directive in targets.split(',').map(str::trim).filter(|d| !d.is_empty()) {
                match directive.parse() {
                    Ok(d) => filter = filter.add_directive(d),
                    Err(_) => eprintln!("Warning: Invalid log filter directive: {}", directive),
                }
            }
        }
        filter
    }
}

/// Install the global subscriber described by `config`.
///
/// With async logging the returned guard must be held for the life of the process;
/// dropping it flushes and stops the background writer.
///
/// ```no_run
/// use xqrest::logging::{init_logging_with_config, LogConfig};
///
/// let _guard = init_logging_with_config(&LogConfig::from_env())
///     .expect("Failed to initialize logging");
/// ```
pub fn init_logging_with_config(config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let (writer, guard) = if config.async_logging {
        let (non_blocking, guard) = tracing_appender::non_blocking(std::io::stdout());
        (tracing_subscriber::fmt::writer::BoxMakeWriter::new(non_blocking), Some(guard))
    } else {
        (tracing_subscriber::fmt::writer::BoxMakeWriter::new(std::io::stdout), None)
    };

    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(writer)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(writer)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(config.env_filter())
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse("PRETTY"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("invalid"), LogFormat::Json);
    }

    #[test]
    fn test_default_dev_and_prod() {
        let dev = LogConfig::default_dev();
        assert_eq!(dev.level(), Level::DEBUG);
        assert_eq!(dev.format, LogFormat::Pretty);
        assert!(dev.include_location);

        let prod = LogConfig::default_prod();
        assert_eq!(prod.level(), Level::INFO);
        assert!(prod.async_logging);
        assert!(!prod.include_location);
    }

    #[test]
    fn test_unknown_level_falls_back_to_info() {
        let mut config = LogConfig::default_dev();
        config.log_level = "chatty".to_string();
        assert_eq!(config.level(), Level::INFO);
    }

    #[test]
    fn test_invalid_target_directive_is_skipped() {
        let mut config = LogConfig::default_dev();
        config.target_filter = Some("xqrest=trace, ,[[bad".to_string());
        // builds without panicking
        let _filter = config.env_filter();
    }

    #[test]
    fn test_second_init_fails() {
        let config = LogConfig::default_dev();
        let _first = init_logging_with_config(&config);
        assert!(init_logging_with_config(&config).is_err());
    }
}
