use std::{
    io::Write as _,
    sync::{OnceLock, RwLock},
};

use log::{Log, Metadata, Record};

static LOGGER: OnceLock<StderrLogger> = OnceLock::new();

pub fn get_logger() -> &'static StderrLogger {
    LOGGER.get_or_init(|| StderrLogger::new(log::LevelFilter::Warn))
}

/// Installs the logger as the global `log` backend.
pub fn init(level: log::LevelFilter) -> Result<(), log::SetLoggerError> {
    let logger = get_logger();
    logger.set_level(level);
    log::set_logger(logger)?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

/// Writes records as `[LEVEL source] message` lines to stderr, keeping stdout for the output.
pub struct StderrLogger {
    min_level: RwLock<log::LevelFilter>,
}

impl StderrLogger {
    fn new(min_level: log::LevelFilter) -> Self {
        Self {
            min_level: RwLock::new(min_level),
        }
    }

    pub fn level(&self) -> log::LevelFilter {
        // a poisoned lock still holds a valid level
        *self.min_level.read().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set_level(&self, level: log::LevelFilter) {
        *self.min_level.write().unwrap_or_else(|e| e.into_inner()) = level;
    }

    pub fn format(record: &Record) -> String {
        format!(
            "[{} {}] {}",
            record.level(),
            record.module_path().unwrap_or("unknown"),
            record.args()
        )
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let _ = writeln!(std::io::stderr().lock(), "{}", Self::format(record));
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}
