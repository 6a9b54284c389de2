//! Log output goes to a file in the data directory because the TUI owns the
//! terminal. Logging is best-effort: if the file cannot be opened the
//! application runs without a subscriber.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

/// Create the data directory if needed and open the log file for appending.
pub fn open_log_file(config: &AppConfig) -> io::Result<File> {
    fs::create_dir_all(config.data_dir())?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(config.log_path())
}

/// Install the global file subscriber. `RUST_LOG` overrides the default
/// `info` level. Returns whether logging is active.
pub fn init(config: &AppConfig) -> bool {
    let Ok(log_file) = open_log_file(config) else {
        return false;
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .is_ok()
}
