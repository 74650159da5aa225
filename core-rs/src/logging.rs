//! Tracing subscriber setup

use crate::config::{LogLevel, LoggingConfig};
use tracing::Level;

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

/// Install a formatting subscriber at the configured level.
///
/// Returns false when a global subscriber was already installed, which is
/// the normal case in tests that call this more than once.
pub fn init_logging(config: &LoggingConfig) -> bool {
    tracing_subscriber::fmt()
        .with_max_level(Level::from(config.level))
        .with_target(true)
        .try_init()
        .is_ok()
}
