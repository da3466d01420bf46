//! Tracing setup for the binary. The library only emits events.

use tracing::debug;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::AppConfig;

/// Log file rollover, from the `rotation` config key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogRotation {
    Hourly,
    Daily,
    Never,
}

impl LogRotation {
    /// Unknown values keep a single file
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "hourly" => LogRotation::Hourly,
            "daily" => LogRotation::Daily,
            _ => LogRotation::Never,
        }
    }

    fn appender_rotation(self) -> Rotation {
        match self {
            LogRotation::Hourly => Rotation::HOURLY,
            LogRotation::Daily => Rotation::DAILY,
            LogRotation::Never => Rotation::NEVER,
        }
    }
}

/// Directives in effect: the override variable when set and non-blank,
/// otherwise the configured level
pub fn filter_directives(config: &AppConfig, from_env: Option<&str>) -> String {
    match from_env.map(str::trim).filter(|d| !d.is_empty()) {
        Some(directives) => directives.to_string(),
        None => config.log_level.clone(),
    }
}

/// Install the global subscriber. Keep the guard alive for the whole process;
/// dropping it flushes and stops the file writer.
pub fn init_logging(config: &AppConfig) -> WorkerGuard {
    let rotation = LogRotation::parse(&config.rotation);
    let appender = RollingFileAppender::new(
        rotation.appender_rotation(),
        &config.log_dir,
        &config.log_file,
    );
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let override_value = std::env::var(&config.log_filter_env).ok();
    let directives = filter_directives(config, override_value.as_deref());
    // a bad override must not silence the screen
    let filter = EnvFilter::try_new(&directives)
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));

    let registry = tracing_subscriber::registry().with(filter);
    if config.use_json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(writer)
                    .with_ansi(false),
            )
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(writer).with_ansi(false))
            .with(fmt::layer().with_target(false).with_ansi(true))
            .init();
    }

    debug!(
        filter = %directives,
        filter_env = %config.log_filter_env,
        rotation = ?rotation,
        "Logging initialised"
    );
    guard
}
