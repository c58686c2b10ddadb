//! Tracing subscriber setup.

use serde::{Deserialize, Serialize};
use tracing::debug;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable overriding the log filter.
pub const LOG_ENV: &str = "DC_SIM_LOG";

/// Output format of the log layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// The `[logging]` section of the configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Filter directive used when neither environment variable is set.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Builds the event filter.
///
/// `DC_SIM_LOG` wins over `RUST_LOG`, which wins over `config.level`. An
/// unparsable directive falls back to `info`.
pub fn build_filter(config: &LoggingConfig) -> EnvFilter {
    let directive = std::env::var(LOG_ENV)
        .or_else(|_| std::env::var(EnvFilter::DEFAULT_ENV))
        .unwrap_or_else(|_| config.level.clone());
    EnvFilter::try_new(&directive).unwrap_or_else(|err| {
        eprintln!("invalid log directive {directive:?} ({err}); defaulting to info");
        EnvFilter::new("info")
    })
}

/// Installs the global subscriber writing to stderr.
///
/// Safe to call more than once; later calls leave the first subscriber in place.
pub fn init_tracing(config: &LoggingConfig) {
    let fmt_layer = match config.format {
        LogFormat::Json => fmt::layer()
            .with_target(false)
            .json()
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(build_filter(config))
        .with(fmt_layer)
        .try_init()
        .ok();

    debug!(format = ?config.format, "tracing initialised");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_pretty_info() {
        let cfg = LoggingConfig::default();
        assert_eq!(cfg.level, "info");
        assert_eq!(cfg.format, LogFormat::Pretty);
    }

    #[test]
    fn format_parses_lowercase() {
        let cfg: LoggingConfig = toml::from_str("format = \"json\"").unwrap_or_default();
        assert_eq!(cfg.format, LogFormat::Json);
        assert_eq!(cfg.level, "info");
    }

    #[test]
    fn init_twice_does_not_panic() {
        let cfg = LoggingConfig::default();
        init_tracing(&cfg);
        init_tracing(&cfg);
    }
}
