use crate::domains::logger::{DomainLogger, DynLogger};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Forwards domain messages to `tracing` under the `plotcheck::placement` target.
struct TracingBridge;

impl DomainLogger for TracingBridge {
    fn info(&self, msg: &str) {
        tracing::info!(target: "plotcheck::placement", "{}", msg);
    }

    fn warn(&self, msg: &str) {
        tracing::warn!(target: "plotcheck::placement", "{}", msg);
    }

    fn error(&self, msg: &str) {
        tracing::error!(target: "plotcheck::placement", "{}", msg);
    }
}

/// Domain logger for processes that installed a `tracing` subscriber.
pub fn init_tracing_logger() -> DynLogger {
    Arc::new(TracingBridge)
}

/// Installs the process-wide `fmt` subscriber on stderr, filtered by
/// `RUST_LOG` or `default_filter`.
///
/// Unlike `SubscriberBuilder::init`, this does not claim the global `log`
/// logger, so `init_file_logger` can still install `fast_log` afterwards.
pub fn install_tracing_subscriber(default_filter: &str) -> Result<(), String> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| format!("Failed to install tracing subscriber: {}", e))
}
