use crate::domains::logger::{DomainLogger, DynLogger};
use std::sync::Arc;

/// Fans every message out to all attached loggers in order.
pub struct MultiLogger {
    sinks: Vec<DynLogger>,
}

impl MultiLogger {
    pub fn new(sinks: Vec<DynLogger>) -> Self {
        Self { sinks }
    }
}

impl DomainLogger for MultiLogger {
    fn info(&self, msg: &str) {
        self.sinks.iter().for_each(|s| s.info(msg));
    }

    fn warn(&self, msg: &str) {
        self.sinks.iter().for_each(|s| s.warn(msg));
    }

    fn error(&self, msg: &str) {
        self.sinks.iter().for_each(|s| s.error(msg));
    }
}

/// Tracing output plus, when `file` is given and `fast_log` starts, a log file.
/// Falls back to tracing alone if the file logger cannot be installed.
pub fn init_combined_logger(file: Option<&str>) -> DynLogger {
    let tracing = super::init_tracing_logger();
    let Some(path) = file else {
        return tracing;
    };
    match super::init_file_logger(path, log::LevelFilter::Info) {
        Ok(file_logger) => Arc::new(MultiLogger::new(vec![tracing, file_logger])),
        Err(e) => {
            tracing.warn(&format!("{}; logging to tracing only", e));
            tracing
        }
    }
}
