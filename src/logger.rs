//! Logging for cohortdesk.
//!
//! Two sinks: an in-memory buffer shown by the UI, and (when enabled in the
//! configuration) a `fern` dispatch that writes every `log` record to a file
//! under the user's data directory.

use anyhow::{Context, Result};
use chrono::Utc;
use log::LevelFilter;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Shared logger that can be used across the application
#[derive(Clone)]
pub struct Logger {
    logs: Arc<Mutex<Vec<String>>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    pub fn new() -> Self {
        Self {
            logs: Arc::new(Mutex::new(Vec::new())),
            log_file: None,
        }
    }

    /// Build a logger from the `[logging]` settings.
    ///
    /// When enabled, installs the global file dispatch at `level`. Installing
    /// twice in one process keeps the first dispatch.
    pub fn from_config(enabled: bool, level: LevelFilter) -> Result<Self> {
        let mut logger = Self::new();
        if enabled {
            let path = Self::get_log_file_path()?;
            init_file_logging(&path, level)?;
            logger.log(format!("File logging enabled at {}", path.display()));
            logger.log_file = Some(path);
        }
        Ok(logger)
    }

    pub fn is_enabled(&self) -> bool {
        self.log_file.is_some()
    }

    pub fn log_file(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Add a log entry and forward it to the `log` facade
    pub fn log(&self, message: String) {
        log::info!("{}", message);

        let timestamp = Utc::now().format("%H:%M:%S%.3f").to_string();
        let formatted_message = format!("[{}] {}", timestamp, message);

        if let Ok(mut logs) = self.logs.lock() {
            logs.push(formatted_message);
        }
    }

    /// Get all logs sorted by date (newest first)
    pub fn get_logs(&self) -> Vec<String> {
        if let Ok(logs) = self.logs.lock() {
            logs.iter().rev().cloned().collect()
        } else {
            Vec::new()
        }
    }

    /// Most recent entry, if any
    pub fn latest(&self) -> Option<String> {
        self.logs.lock().ok().and_then(|logs| logs.last().cloned())
    }

    /// Clear all logs
    pub fn clear(&self) {
        if let Ok(mut logs) = self.logs.lock() {
            logs.clear();
        }
    }

    /// `<data_local_dir>/cohortdesk/cohortdesk.log`
    pub fn get_log_file_path() -> Result<PathBuf> {
        dirs::data_local_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))
            .map(|dir| dir.join("cohortdesk").join("cohortdesk.log"))
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

/// Route `log` records at or above `level` to `path`.
pub fn init_file_logging(path: &Path, level: LevelFilter) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }
    let file = fern::log_file(path).with_context(|| format!("Failed to open log file: {}", path.display()))?;

    let installed = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} {:<5} [{}] {}",
                Utc::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(file)
        .apply();

    if installed.is_err() {
        log::debug!("Global logger already installed, keeping it");
    }
    Ok(())
}
