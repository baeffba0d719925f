//! Store Configuration
//!
//! Database path and log directory, either explicit or derived from
//! `TIERLIST_DATA_DIR`.

use std::path::{Path, PathBuf};

use crate::commands::StoreState;
use crate::repository::init_db;

pub const DATA_DIR_ENV: &str = "TIERLIST_DATA_DIR";
pub const DB_FILE_NAME: &str = "tierlist.db";
pub const LOG_DIR_NAME: &str = "logs";
pub const APP_NAME: &str = "Tierlist";
const IN_MEMORY: &str = ":memory:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub db_path: PathBuf,
    /// No file logging when unset
    pub log_dir: Option<PathBuf>,
}

impl StoreConfig {
    pub fn new(db_path: impl Into<PathBuf>, log_dir: Option<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            log_dir,
        }
    }

    /// Everything under one data directory
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self::new(dir.join(DB_FILE_NAME), Some(dir.join(LOG_DIR_NAME)))
    }

    pub fn in_memory() -> Self {
        Self::new(IN_MEMORY, None)
    }

    /// Data directory from the environment, else the working directory
    pub fn from_env() -> Self {
        match std::env::var_os(DATA_DIR_ENV) {
            Some(dir) if !dir.is_empty() => Self::in_dir(PathBuf::from(dir)),
            _ => Self::in_dir("."),
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.db_path.as_os_str() == IN_MEMORY
    }
}

/// Start logging (if configured), open the database and run migrations
pub async fn open_store(config: &StoreConfig) -> Result<StoreState, String> {
    if let Some(log_dir) = &config.log_dir {
        rolling_logger::init_logger(log_dir, APP_NAME)
            .map_err(|e| format!("Failed to init logger: {}", e))?;
    }

    if !config.is_in_memory() {
        if let Some(parent) = config.db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| format!("Failed to create data dir: {}", e))?;
        }
    }

    match init_db(&config.db_path).await {
        Ok(db) => {
            let _ = rolling_logger::info(&format!("DB ready at {}", config.db_path.display()));
            Ok(StoreState::new(db))
        }
        Err(e) => {
            let _ = rolling_logger::error(&format!("DB init failed: {}", e));
            Err(e)
        }
    }
}
