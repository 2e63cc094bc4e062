use crate::domains::logger::{DomainLogger, DynLogger};
use chrono::Utc;
use std::sync::Arc;

/// Writes through the global `log` facade, which `fast_log` backs.
struct FastLogBridge;

impl DomainLogger for FastLogBridge {
    fn info(&self, msg: &str) {
        log::info!("{} - {}", Utc::now().to_rfc3339(), msg);
    }

    fn warn(&self, msg: &str) {
        log::warn!("{} - {}", Utc::now().to_rfc3339(), msg);
    }

    fn error(&self, msg: &str) {
        log::error!("{} - {}", Utc::now().to_rfc3339(), msg);
    }
}

/// Install `fast_log` (file at `path` plus console) and return a logger writing to it.
/// `fast_log` registers itself as the global logger, so this succeeds once per process.
pub fn init_file_logger(path: &str, level: log::LevelFilter) -> Result<DynLogger, String> {
    fast_log::init(
        fast_log::config::Config::new()
            .console()
            .file(path)
            .level(level),
    )
    .map_err(|e| format!("Failed to initialize fast_log: {}", e))?;
    Ok(Arc::new(FastLogBridge))
}
