//! Where the application keeps its files. Everything lives in one folder
//! beneath the user's home unless `HOSTEL_ROOMS_HOME` points elsewhere.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use directories::BaseDirs;

use crate::store::DEFAULT_STORAGE_KEY;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".hostel-rooms";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "rooms.sqlite";
/// Log file written next to the database; the TUI owns the terminal.
const LOG_FILE_NAME: &str = "hostel-rooms.log";
/// Environment variable overriding the data directory.
pub const HOME_ENV: &str = "HOSTEL_ROOMS_HOME";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Directory holding the database and the log file.
    pub data_dir: PathBuf,
    /// Key the room collection is saved under.
    pub storage_key: String,
}

impl AppConfig {
    /// Resolve the data directory from the environment override or the home
    /// directory.
    pub fn resolve() -> Result<Self> {
        let data_dir = match env::var_os(HOME_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => {
                let base_dirs =
                    BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
                base_dirs.home_dir().join(DATA_DIR_NAME)
            }
        };
        Ok(Self::with_data_dir(data_dir))
    }

    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE_NAME)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
