//! Debug logging to a file.
//!
//! The terminal is busy showing the edited line, so log records go to a file
//! instead. Set `LINEKIT_DEBUG=1` (or `true`) and call [`init`]; records are
//! appended to `tmp/linekit-debug.log` when a `tmp/` directory exists in the
//! working directory, otherwise to `/tmp/linekit-debug.log`.

use log::{LevelFilter, Log, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

const ENV_ENABLE_LOG: &str = "LINEKIT_DEBUG";

static LOGGER: OnceLock<FileLogger> = OnceLock::new();

/// A `log` backend appending timestamped records to a file.
pub struct FileLogger {
    file: Mutex<File>,
    level: LevelFilter,
}

impl FileLogger {
    pub fn new(file: File, level: LevelFilter) -> Self {
        FileLogger {
            file: Mutex::new(file),
            level,
        }
    }
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(
                file,
                "[{timestamp}] {:<5} {}: {}",
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

fn is_enabled_value(value: &str) -> bool {
    value == "true" || value == "1"
}

/// Whether `LINEKIT_DEBUG` asks for a debug log.
pub fn is_enabled() -> bool {
    std::env::var(ENV_ENABLE_LOG)
        .map(|value| is_enabled_value(&value))
        .unwrap_or(false)
}

/// Where the debug log is written.
pub fn log_path() -> PathBuf {
    if Path::new("tmp").is_dir() {
        PathBuf::from("tmp/linekit-debug.log")
    } else {
        PathBuf::from("/tmp/linekit-debug.log")
    }
}

/// Install the file logger if `LINEKIT_DEBUG` is set.
///
/// Returns whether a logger was installed. Failing to open the file is
/// reported on stderr and otherwise ignored.
pub fn init() -> bool {
    if !is_enabled() {
        return false;
    }
    let path = log_path();
    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Failed to open debug log file {}: {e}", path.display());
            return false;
        }
    };
    let logger = LOGGER.get_or_init(|| FileLogger::new(file, LevelFilter::Trace));
    match log::set_logger(logger) {
        Ok(()) => {
            log::set_max_level(LevelFilter::Trace);
            eprintln!("linekit debug log enabled: {}", path.display());
            true
        }
        Err(_) => false,
    }
}
