use geo::Polygon;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use std::sync::Arc;

use crate::domains::logger::DynLogger;

use super::classifier::{ClassifiedFeatures, FeatureClassifier};
use super::coordinates::meters_to_degrees_lat;
use super::footprint::Footprint;
use super::geometry::{GeometryKernel, PlanarKernel};
use super::ports::MapDataSource;
use super::rules::{LENGTH_FACTOR, WIDTH_FACTOR};
use super::settings::{AccessPolicy, PlacementConfig};
use super::types::{BuildingShape, GeoPoint, PlacementQuery, Verdict};

pub const UNKNOWN_BUILDING_TYPE: &str = "Unknown building type";
pub const INVALID_COORDINATES: &str = "Invalid coordinates";
pub const INVALID_DIMENSIONS: &str = "Invalid building dimensions";
pub const ON_BRIDGE: &str = "Cannot build on a bridge";
pub const NO_ACCESS: &str = "No access: no passable roads found nearby";

/// Latitudes beyond this make the longitude scale meaningless.
pub const MAX_ABS_LATITUDE: f64 = 89.9;

pub fn size_exceeded(building_type: &str) -> String {
    format!("Size exceeds allowed maximum for '{}'", building_type)
}

pub fn road_too_far(meters: f64) -> String {
    format!("No access: nearest passable road is farther than {} m", meters)
}

/// Everything computed while deciding one query.
#[derive(Debug, Clone)]
pub struct DecisionReport {
    pub verdict: Verdict,
    pub search_radius_deg: Option<f64>,
    pub footprint: Option<Footprint>,
    pub features: ClassifiedFeatures,
}

impl DecisionReport {
    fn rejected_early(verdict: Verdict) -> Self {
        Self {
            verdict,
            search_radius_deg: None,
            footprint: None,
            features: ClassifiedFeatures::default(),
        }
    }

    /// Footprint plus the classified features, for map debugging.
    pub fn to_geojson(&self) -> FeatureCollection {
        let mut features = Vec::new();
        if let Some(footprint) = &self.footprint {
            features.push(footprint.to_geojson());
        }
        for zone in &self.features.forbidden {
            features.push(feature(
                Value::from(&zone.geometry),
                "forbidden",
                zone.source_id,
                Some(&zone.reason),
            ));
        }
        for road in &self.features.roads {
            features.push(feature(Value::from(&road.line), "road", road.source_id, None));
        }
        for bridge in &self.features.bridges {
            features.push(feature(Value::from(&bridge.line), "bridge", bridge.source_id, None));
        }
        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }
}

fn feature(value: Value, kind: &str, source_id: i64, reason: Option<&str>) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("kind".to_string(), kind.into());
    properties.insert("osm_id".to_string(), source_id.into());
    if let Some(reason) = reason {
        properties.insert("reason".to_string(), reason.into());
    }
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Decides whether a building may be placed at a location.
///
/// Each call runs validate -> fetch -> classify -> footprint -> checks on its
/// own data; the engine holds only read-only configuration and can be shared
/// between concurrent callers.
pub struct PlacementEngine {
    config: PlacementConfig,
    source: Arc<dyn MapDataSource>,
    kernel: Arc<dyn GeometryKernel>,
    logger: DynLogger,
}

impl PlacementEngine {
    pub fn new(config: PlacementConfig, source: Arc<dyn MapDataSource>, logger: DynLogger) -> Self {
        Self {
            config,
            source,
            kernel: Arc::new(PlanarKernel),
            logger,
        }
    }

    pub fn with_kernel(mut self, kernel: Arc<dyn GeometryKernel>) -> Self {
        self.kernel = kernel;
        self
    }

    pub async fn decide(&self, query: &PlacementQuery) -> Verdict {
        self.decide_with_report(query).await.verdict
    }

    pub async fn decide_with_report(&self, query: &PlacementQuery) -> DecisionReport {
        if let Err(reason) = self.validate(query) {
            self.logger.info(&format!(
                "Rejected '{}' at ({:.6}, {:.6}) before fetch: {}",
                query.building_type, query.center.lat, query.center.lon, reason
            ));
            return DecisionReport::rejected_early(Verdict::Denied(reason));
        }

        let radius = self.search_radius(query);
        let elements = match self.source.fetch_elements(query.center, radius).await {
            Ok(elements) => elements,
            Err(e) => {
                self.logger.warn(&format!(
                    "Map data fetch failed, continuing with no elements: {}",
                    e
                ));
                Vec::new()
            }
        };

        let features = FeatureClassifier::new(&self.config.rules, self.kernel.as_ref())
            .with_line_buffer(self.config.settings.line_buffer_deg)
            .classify(&elements);
        if features.skipped > 0 {
            self.logger.warn(&format!(
                "Skipped {} map ways with unusable geometry",
                features.skipped
            ));
        }

        let footprint = match Footprint::from_shape(query.center, &query.shape) {
            Ok(footprint) => footprint,
            Err(e) => {
                self.logger.warn(&format!("Footprint construction failed: {}", e));
                return DecisionReport {
                    verdict: Verdict::deny(INVALID_DIMENSIONS),
                    search_radius_deg: Some(radius),
                    footprint: None,
                    features,
                };
            }
        };

        let verdict = self.evaluate(query.center, &footprint, &features);
        self.logger.info(&format!(
            "Decision for '{}' at ({:.6}, {:.6}): {} [{} elements, {} zones, {} roads, {} bridges]",
            query.building_type,
            query.center.lat,
            query.center.lon,
            verdict.reason().unwrap_or("allowed"),
            elements.len(),
            features.forbidden.len(),
            features.roads.len(),
            features.bridges.len(),
        ));

        DecisionReport {
            verdict,
            search_radius_deg: Some(radius),
            footprint: Some(footprint),
            features,
        }
    }

    /// Checks that need no map data. `Err` carries the denial reason.
    pub fn validate(&self, query: &PlacementQuery) -> Result<(), String> {
        let limit = *self
            .config
            .building_limits
            .get(&query.building_type)
            .ok_or_else(|| UNKNOWN_BUILDING_TYPE.to_string())?;

        let oversized = match query.shape {
            BuildingShape::Rectangle { length, width, .. } => {
                length > limit * LENGTH_FACTOR || width > limit * WIDTH_FACTOR
            }
            BuildingShape::Circle { size } => size > limit,
        };
        if oversized {
            return Err(size_exceeded(&query.building_type));
        }

        if !query.shape.has_positive_dimensions() {
            return Err(INVALID_DIMENSIONS.to_string());
        }

        let center = query.center;
        if !center.is_finite() || center.lat.abs() >= MAX_ABS_LATITUDE {
            return Err(INVALID_COORDINATES.to_string());
        }
        Ok(())
    }

    /// Half-size of the fetch box in degrees of latitude.
    pub fn search_radius(&self, query: &PlacementQuery) -> f64 {
        let meters = query.shape.half_extent() + self.config.settings.search_margin_m;
        meters_to_degrees_lat(meters, query.center.lat)
    }

    /// Rule checks in order; the first failing one decides.
    pub fn evaluate(&self, center: GeoPoint, footprint: &Footprint, features: &ClassifiedFeatures) -> Verdict {
        let polygon = footprint.to_polygon();

        let mut zones: Vec<_> = features.forbidden.iter().collect();
        zones.sort_by_key(|zone| zone.priority);
        if let Some(zone) = zones
            .into_iter()
            .find(|zone| self.kernel.intersects(&polygon, &zone.geometry))
        {
            return Verdict::deny(zone.reason.clone());
        }

        let bridge_margin = meters_to_degrees_lat(self.config.settings.bridge_buffer_m, center.lat);
        if features.bridges.iter().any(|bridge| {
            let area = self.kernel.buffer_line(&bridge.line, bridge_margin);
            self.kernel.intersects(&polygon, &area)
        }) {
            return Verdict::deny(ON_BRIDGE);
        }

        self.check_access(center, &polygon, features)
    }

    fn check_access(&self, center: GeoPoint, polygon: &Polygon<f64>, features: &ClassifiedFeatures) -> Verdict {
        match self.config.settings.access {
            AccessPolicy::AnyRoadPresent => {
                if features.roads.is_empty() {
                    Verdict::deny(NO_ACCESS)
                } else {
                    Verdict::Allowed
                }
            }
            AccessPolicy::WithinDistance { meters } => {
                if features.roads.is_empty() {
                    return Verdict::deny(NO_ACCESS);
                }
                let limit = meters_to_degrees_lat(meters, center.lat);
                let reachable = features
                    .roads
                    .iter()
                    .any(|road| self.kernel.distance(polygon, &road.line) <= limit);
                if reachable {
                    Verdict::Allowed
                } else {
                    Verdict::Denied(road_too_far(meters))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{DomainError, DomainResult};
    use crate::domains::logger::DomainLogger;
    use crate::domains::placement::types::MapElement;
    use async_trait::async_trait;

    struct Silent;

    impl DomainLogger for Silent {
        fn info(&self, _msg: &str) {}
        fn warn(&self, _msg: &str) {}
        fn error(&self, _msg: &str) {}
    }

    struct Fixed(Vec<MapElement>);

    #[async_trait]
    impl MapDataSource for Fixed {
        async fn fetch_elements(&self, _center: GeoPoint, _radius_deg: f64) -> DomainResult<Vec<MapElement>> {
            Ok(self.0.clone())
        }
    }

    struct Broken;

    #[async_trait]
    impl MapDataSource for Broken {
        async fn fetch_elements(&self, _center: GeoPoint, _radius_deg: f64) -> DomainResult<Vec<MapElement>> {
            Err(DomainError::DataSource("connection reset".to_string()))
        }
    }

    fn engine(source: Arc<dyn MapDataSource>) -> PlacementEngine {
        PlacementEngine::new(PlacementConfig::default(), source, Arc::new(Silent))
    }

    fn house() -> PlacementQuery {
        PlacementQuery::rectangle(GeoPoint::new(55.75, 37.62), "house", 15.0, 8.0, 0.0)
    }

    #[test]
    fn search_radius_covers_half_diagonal_plus_margin() {
        let e = engine(Arc::new(Fixed(vec![])));
        let q = house();
        let expected = meters_to_degrees_lat(17f64 / 2.0 + 150.0, 55.75);
        assert!((e.search_radius(&q) - expected).abs() < 1e-12);
    }

    #[test]
    fn validation_reasons() {
        let e = engine(Arc::new(Fixed(vec![])));
        let center = GeoPoint::new(55.75, 37.62);

        let unknown = PlacementQuery::rectangle(center, "castle", 10.0, 10.0, 0.0);
        assert_eq!(e.validate(&unknown), Err(UNKNOWN_BUILDING_TYPE.to_string()));

        // house limit 20: length up to 36, width up to 24
        let long_ok = PlacementQuery::rectangle(center, "house", 35.9, 23.9, 0.0);
        assert_eq!(e.validate(&long_ok), Ok(()));
        let too_wide = PlacementQuery::rectangle(center, "house", 10.0, 24.5, 0.0);
        assert_eq!(e.validate(&too_wide), Err(size_exceeded("house")));

        let circle = PlacementQuery::circle(center, "house", 21.0);
        assert_eq!(e.validate(&circle), Err(size_exceeded("house")));

        let pole = PlacementQuery::rectangle(GeoPoint::new(90.0, 0.0), "house", 10.0, 10.0, 0.0);
        assert_eq!(e.validate(&pole), Err(INVALID_COORDINATES.to_string()));

        let flat = PlacementQuery::rectangle(center, "house", 0.0, 10.0, 0.0);
        assert_eq!(e.validate(&flat), Err(INVALID_DIMENSIONS.to_string()));

        // Size limits are checked before the geometry is looked at.
        let long_and_flat = PlacementQuery::rectangle(center, "house", 100.0, 0.0, 0.0);
        assert_eq!(e.validate(&long_and_flat), Err(size_exceeded("house")));
    }

    #[test]
    fn fetch_failure_degrades_to_no_access() {
        let e = engine(Arc::new(Broken));
        let verdict = tokio_test::block_on(e.decide(&house()));
        assert_eq!(verdict, Verdict::deny(NO_ACCESS));
    }

    #[test]
    fn early_rejection_skips_fetch() {
        let e = engine(Arc::new(Broken));
        let q = PlacementQuery::rectangle(GeoPoint::new(55.75, 37.62), "cottage", 60.0, 10.0, 0.0);
        let report = tokio_test::block_on(e.decide_with_report(&q));
        assert_eq!(report.verdict, Verdict::Denied(size_exceeded("cottage")));
        assert!(report.search_radius_deg.is_none());
        assert!(report.footprint.is_none());
    }
}
