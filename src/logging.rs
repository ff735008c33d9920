//! Kernel logging facility
//!
//! Backs the `log` facade with COM1. Log levels follow the build
//! configuration (debug/release).

use core::fmt::Write;

use log::{LevelFilter, Log, Metadata, Record};

use crate::SERIAL;

pub static LOGGER: Logger = Logger;

#[cfg(debug_assertions)]
const MAX_LEVEL: LevelFilter = LevelFilter::Debug;
#[cfg(not(debug_assertions))]
const MAX_LEVEL: LevelFilter = LevelFilter::Info;

pub struct Logger;

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    /// Formats messages as "[LEVEL] message".
    ///
    /// A record emitted from a trap taken while the foreground holds the
    /// serial port is dropped.
    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Some(mut serial) = SERIAL.try_lock() {
            let _ = writeln!(serial, "[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

/// Installs the serial logger. Later calls leave the first logger in place.
pub fn init() {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(MAX_LEVEL);
    }
}
