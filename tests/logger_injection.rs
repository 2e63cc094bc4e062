use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use plotcheck::common::{DomainError, DomainResult};
use plotcheck::domains::logger::{DomainLogger, DynLogger};
use plotcheck::domains::placement::*;

struct BridgeCapture {
    messages: Arc<Mutex<Vec<String>>>,
}

impl BridgeCapture {
    fn new() -> Self { Self { messages: Arc::new(Mutex::new(Vec::new())) } }
}

impl DomainLogger for BridgeCapture {
    fn info(&self, msg: &str) { self.messages.lock().unwrap().push(format!("INFO:{}", msg)); }
    fn warn(&self, msg: &str) { self.messages.lock().unwrap().push(format!("WARN:{}", msg)); }
    fn error(&self, msg: &str) { self.messages.lock().unwrap().push(format!("ERR:{}", msg)); }
}

struct Unreachable;

#[async_trait]
impl MapDataSource for Unreachable {
    async fn fetch_elements(&self, _center: GeoPoint, _radius_deg: f64) -> DomainResult<Vec<MapElement>> {
        Err(DomainError::DataSource("connection refused".to_string()))
    }
}

struct Fixed(Vec<MapElement>);

#[async_trait]
impl MapDataSource for Fixed {
    async fn fetch_elements(&self, _center: GeoPoint, _radius_deg: f64) -> DomainResult<Vec<MapElement>> {
        Ok(self.0.clone())
    }
}

fn query() -> PlacementQuery {
    PlacementQuery::rectangle(GeoPoint::new(52.52, 13.40), "house", 12.0, 9.0, 15.0)
}

#[tokio::test]
async fn test_fetch_failure_is_logged_as_warning() {
    let capture = Arc::new(BridgeCapture::new());
    let logger = capture.clone() as DynLogger;
    let engine = PlacementEngine::new(PlacementConfig::default(), Arc::new(Unreachable), logger);

    let verdict = engine.decide(&query()).await;
    assert_eq!(verdict, Verdict::deny(NO_ACCESS));

    let msgs = capture.messages.lock().unwrap();
    assert!(msgs.iter().any(|m| m.starts_with("WARN:") && m.contains("connection refused")));
    assert!(msgs.iter().any(|m| m.starts_with("INFO:") && m.contains(NO_ACCESS)));
}

#[tokio::test]
async fn test_skipped_geometry_is_reported() {
    let capture = Arc::new(BridgeCapture::new());
    let logger = capture.clone() as DynLogger;
    let elements = vec![
        MapElement::node(1, GeoPoint::new(52.52, 13.40)),
        MapElement::node(2, GeoPoint::new(52.5201, 13.4001)),
        MapElement::node(3, GeoPoint::new(52.52, 13.4001)),
        MapElement::node(4, GeoPoint::new(52.5201, 13.40)),
        // Bow tie: crosses itself.
        MapElement::way(10, vec![1, 2, 3, 4, 1]).with_tag("building", "yes"),
    ];
    let engine = PlacementEngine::new(PlacementConfig::default(), Arc::new(Fixed(elements)), logger);
    engine.decide(&query()).await;

    let msgs = capture.messages.lock().unwrap();
    assert!(msgs.iter().any(|m| m.contains("Skipped 1 map ways")));
}

#[tokio::test]
async fn test_early_rejection_logs_reason() {
    let capture = Arc::new(BridgeCapture::new());
    let logger = capture.clone() as DynLogger;
    let engine = PlacementEngine::new(PlacementConfig::default(), Arc::new(Unreachable), logger);

    let q = PlacementQuery::rectangle(GeoPoint::new(52.52, 13.40), "palace", 12.0, 9.0, 0.0);
    engine.decide(&q).await;

    let msgs = capture.messages.lock().unwrap();
    assert_eq!(msgs.len(), 1);
    assert!(msgs[0].contains("before fetch"));
    assert!(msgs[0].contains("Unknown building type"));
}

#[test]
fn test_multi_and_noop_loggers() {
    let first = Arc::new(BridgeCapture::new());
    let second = Arc::new(BridgeCapture::new());
    let multi = plotcheck::adapters::outbound::MultiLogger::new(vec![
        first.clone() as DynLogger,
        plotcheck::adapters::outbound::init_noop_logger(),
        second.clone() as DynLogger,
    ]);

    multi.info("one");
    multi.warn("two");
    multi.error("three");

    for capture in [&first, &second] {
        let msgs = capture.messages.lock().unwrap();
        assert_eq!(*msgs, vec!["INFO:one", "WARN:two", "ERR:three"]);
    }

    // Without a file, the combined logger is tracing only and must not panic.
    let combined = plotcheck::adapters::outbound::init_combined_logger(None);
    combined.info("ignored");
}
