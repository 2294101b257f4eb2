//! Minimal stderr logger for the host simulator.
//!
//! The device uses `esp_idf_logger`; on the host nothing else is installed,
//! so this prints `LEVEL target: message` to stderr. Stdout stays reserved
//! for the command console.

use std::io::Write;

use log::{LevelFilter, Log, Metadata, Record};

/// Environment variable holding the level name.
pub const LEVEL_ENV: &str = "LEDSTRIP_LOG";

pub struct StderrLogger {
    level: LevelFilter,
}

impl StderrLogger {
    /// Install as the global logger, level from [`LEVEL_ENV`] (default info).
    pub fn init() -> Result<(), log::SetLoggerError> {
        let level = std::env::var(LEVEL_ENV)
            .ok()
            .and_then(|v| parse_level(&v))
            .unwrap_or(LevelFilter::Info);
        Self::init_with(level)
    }

    pub fn init_with(level: LevelFilter) -> Result<(), log::SetLoggerError> {
        let logger: &'static StderrLogger = Box::leak(Box::new(StderrLogger { level }));
        log::set_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut err = std::io::stderr().lock();
        let _ = writeln!(err, "{:<5} {}: {}", record.level(), record.target(), record.args());
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// `error|warn|info|debug|trace|off`, any case.
pub fn parse_level(text: &str) -> Option<LevelFilter> {
    text.trim().parse().ok()
}
