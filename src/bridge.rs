//! Bridge from the `log` crate facade
//!
//! Installing a [`LogBridge`] routes `log::info!` and friends through a
//! [`Logger`]: the record target becomes the source.

use crate::core::{Logger, LoggerError, Result, Severity};
use log::{LevelFilter, Metadata};

pub struct LogBridge {
    logger: Logger,
    level: LevelFilter,
}

impl LogBridge {
    pub fn new(logger: Logger, level: LevelFilter) -> Self {
        Self { logger, level }
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Install as the global `log` logger
    ///
    /// Fails if another global logger is already set.
    pub fn init(logger: Logger, level: LevelFilter) -> Result<()> {
        log::set_boxed_logger(Box::new(Self::new(logger, level)))
            .map(|()| log::set_max_level(level))
            .map_err(|e| LoggerError::invalid_argument("init", e.to_string()))
    }
}

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &log::Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let severity = Severity::from(record.level());
        if let Err(e) = self
            .logger
            .log(severity, record.target(), record.args().to_string())
        {
            eprintln!("[LOGGER ERROR] Failed to forward log record: {}", e);
        }
    }

    fn flush(&self) {
        if let Err(e) = self.logger.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush logger: {}", e);
        }
    }
}
