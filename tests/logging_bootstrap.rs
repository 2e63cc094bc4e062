// Global logger state is per process, so this file holds a single test.
use plotcheck::adapters::outbound::{init_file_logger, install_tracing_subscriber};
use plotcheck::domains::logger::DomainLogger;
use tempfile::tempdir;

#[test]
fn test_file_logger_starts_after_tracing_subscriber() {
    install_tracing_subscriber("info").unwrap();
    assert!(install_tracing_subscriber("info").is_err());

    let dir = tempdir().unwrap();
    let path = dir.path().join("plotcheck.log");
    let logger = init_file_logger(path.to_str().unwrap(), log::LevelFilter::Info)
        .expect("fast_log must still be free to claim the log facade");
    logger.info("file logging is live");
    assert!(path.exists());
}
