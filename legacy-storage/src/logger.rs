//! Forwards this crate's `log` records to a logger supplied by the host app.

use std::sync::{Arc, OnceLock};

/// Logger implemented by the host application.
///
/// ## Swift
///
/// ```swift
/// final class LegacyStorageLogBridge: LegacyStorage.Logger {
///     func log(level: LegacyStorage.LogLevel, message: String) {
///         Log.log(level.toCoreLevel(), message)
///     }
/// }
///
/// LegacyStorage.setLogger(logger: LegacyStorageLogBridge()) // once, at startup
/// ```
#[uniffi::export(with_foreign)]
pub trait Logger: Sync + Send {
    /// Logs a message at the specified level.
    fn log(&self, level: LogLevel, message: String);
}

/// Severity of a forwarded log message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum LogLevel {
    /// Very low priority, extremely detailed messages.
    Trace,
    /// Lower priority debugging information.
    Debug,
    /// Progress of the migration.
    Info,
    /// Potentially harmful situations.
    Warn,
    /// Failures the caller may still recover from.
    Error,
}

impl From<log::Level> for LogLevel {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Self::Error,
            log::Level::Warn => Self::Warn,
            log::Level::Info => Self::Info,
            log::Level::Debug => Self::Debug,
            log::Level::Trace => Self::Trace,
        }
    }
}

/// `log::Log` implementation that hands records to [`LOGGER_INSTANCE`].
struct ForeignLogger;

impl log::Log for ForeignLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        is_forwarded(metadata.level(), metadata.target())
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Some(logger) = LOGGER_INSTANCE.get() {
            logger.log(record.level().into(), record.args().to_string());
        }
    }

    fn flush(&self) {}
}

/// Debug and trace records are only forwarded when they come from this crate.
fn is_forwarded(level: log::Level, target: &str) -> bool {
    level <= log::Level::Info || target.starts_with("legacy_storage")
}

static LOGGER_INSTANCE: OnceLock<Arc<dyn Logger>> = OnceLock::new();

/// Installs the host application's logger.
///
/// Only the first call takes effect; later calls are ignored. If another
/// `log` logger is already installed in the process, records are not
/// forwarded and the failure is reported on stderr.
#[uniffi::export]
pub fn set_logger(logger: Arc<dyn Logger>) {
    if LOGGER_INSTANCE.set(logger).is_err() {
        return;
    }
    if let Err(e) = init_logger() {
        eprintln!("Failed to set logger: {e}");
    }
}

fn init_logger() -> Result<(), log::SetLoggerError> {
    static FORWARDER: ForeignLogger = ForeignLogger;
    log::set_logger(&FORWARDER)?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}
