// Placement service - the entry point a web or CLI front end calls into.
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::common::{ApplicationError, ApplicationResult, DomainError};
use crate::config::Config;
use crate::domains::logger::DynLogger;
use crate::domains::placement::{
    DecisionReport, GeoPoint, MapDataSource, PlacementEngine, PlacementQuery, Verdict, INVALID_DIMENSIONS,
};

/// Incoming check request as posted by the map front end.
///
/// `length` + `width` (+ optional `rotation`) select the rectangular
/// footprint; `size` alone selects the legacy circular one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckRequest {
    pub lat: f64,
    pub lng: f64,
    pub building_type: String,
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub rotation: Option<f64>,
    #[serde(default)]
    pub size: Option<f64>,
}

impl CheckRequest {
    pub fn into_query(self) -> ApplicationResult<PlacementQuery> {
        let center = GeoPoint::new(self.lat, self.lng);
        match (self.length, self.width, self.size) {
            (Some(length), Some(width), _) => Ok(PlacementQuery::rectangle(
                center,
                self.building_type,
                length,
                width,
                self.rotation.unwrap_or(0.0),
            )),
            (None, None, Some(size)) => Ok(PlacementQuery::circle(center, self.building_type, size)),
            _ => Err(ApplicationError::InvalidRequest(
                "either length and width, or size, must be given".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResponse {
    pub allowed: bool,
    pub reason: Option<String>,
}

impl From<Verdict> for CheckResponse {
    fn from(verdict: Verdict) -> Self {
        let (allowed, reason) = verdict.into_pair();
        Self { allowed, reason }
    }
}

pub struct PlacementService {
    engine: PlacementEngine,
    logger: DynLogger,
}

impl PlacementService {
    pub fn new(engine: PlacementEngine, logger: DynLogger) -> Self {
        Self { engine, logger }
    }

    /// Fails when the configuration does not validate.
    pub fn from_config(config: &Config, source: Arc<dyn MapDataSource>, logger: DynLogger) -> ApplicationResult<Self> {
        config.validate()?;
        let engine = PlacementEngine::new(config.placement.clone(), source, logger.clone());
        Ok(Self::new(engine, logger))
    }

    pub async fn check(&self, request: CheckRequest) -> CheckResponse {
        self.report(request).await.verdict.into()
    }

    pub async fn report(&self, request: CheckRequest) -> DecisionReport {
        match request.into_query() {
            Ok(query) => self.engine.decide_with_report(&query).await,
            Err(e) => {
                self.logger.warn(&format!("Rejected malformed request: {}", e));
                DecisionReport {
                    verdict: Verdict::deny(INVALID_DIMENSIONS),
                    search_radius_deg: None,
                    footprint: None,
                    features: Default::default(),
                }
            }
        }
    }

    /// JSON in, JSON out; only undecodable input is an error.
    pub async fn check_json(&self, body: &str) -> ApplicationResult<String> {
        let request: CheckRequest = serde_json::from_str(body).map_err(DomainError::from)?;
        let response = self.check(request).await;
        Ok(serde_json::to_string(&response).map_err(DomainError::from)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::outbound::init_noop_logger;
    use crate::common::DomainResult;
    use crate::domains::placement::{BuildingShape, MapElement};
    use async_trait::async_trait;

    struct Empty;

    #[async_trait]
    impl MapDataSource for Empty {
        async fn fetch_elements(&self, _center: GeoPoint, _radius_deg: f64) -> DomainResult<Vec<MapElement>> {
            Ok(Vec::new())
        }
    }

    fn request() -> CheckRequest {
        CheckRequest {
            lat: 55.75,
            lng: 37.62,
            building_type: "house".to_string(),
            length: None,
            width: None,
            rotation: None,
            size: None,
        }
    }

    #[test]
    fn rectangle_wins_over_size_and_rotation_defaults_to_zero() {
        let req = CheckRequest {
            length: Some(15.0),
            width: Some(8.0),
            size: Some(3.0),
            ..request()
        };
        let q = req.into_query().unwrap();
        assert_eq!(
            q.shape,
            BuildingShape::Rectangle {
                length: 15.0,
                width: 8.0,
                rotation: 0.0
            }
        );
        assert_eq!(q.center, GeoPoint::new(55.75, 37.62));
    }

    #[test]
    fn size_alone_selects_circle() {
        let req = CheckRequest {
            size: Some(12.0),
            ..request()
        };
        assert_eq!(req.into_query().unwrap().shape, BuildingShape::Circle { size: 12.0 });
    }

    #[test]
    fn half_a_rectangle_is_rejected() {
        let req = CheckRequest {
            length: Some(15.0),
            ..request()
        };
        assert!(matches!(req.into_query(), Err(ApplicationError::InvalidRequest(_))));
    }

    #[test]
    fn response_from_verdict() {
        assert_eq!(
            CheckResponse::from(Verdict::Allowed),
            CheckResponse {
                allowed: true,
                reason: None
            }
        );
        let denied = CheckResponse::from(Verdict::deny("Park"));
        assert!(!denied.allowed);
        assert_eq!(denied.reason.as_deref(), Some("Park"));
    }

    #[test]
    fn invalid_config_is_refused() {
        let mut config = Config::default();
        config.overpass.timeout_secs = 0;
        let result = PlacementService::from_config(&config, Arc::new(Empty), init_noop_logger());
        assert!(matches!(result, Err(ApplicationError::Configuration(_))));
    }

    #[tokio::test]
    async fn undecodable_body_is_a_serialization_error() {
        let svc = PlacementService::from_config(&Config::default(), Arc::new(Empty), init_noop_logger()).unwrap();
        let err = svc.check_json("{\"lat\": ").await.unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::Domain(DomainError::SerializationError(_))
        ));
    }
}
