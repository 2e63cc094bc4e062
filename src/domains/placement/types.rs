use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A geodetic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }

    /// Planar (x, y) pair as used by the geometry kernel: x = lon, y = lat.
    pub fn to_coord(self) -> geo::Coord<f64> {
        geo::Coord {
            x: self.lon,
            y: self.lat,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Node,
    Way,
    Relation,
}

/// Raw map record as delivered by a map data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapElement {
    pub kind: ElementKind,
    pub id: i64,
    #[serde(default)]
    pub node_refs: Vec<i64>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
    #[serde(default)]
    pub position: Option<GeoPoint>,
}

impl MapElement {
    pub fn node(id: i64, position: GeoPoint) -> Self {
        Self {
            kind: ElementKind::Node,
            id,
            node_refs: Vec::new(),
            tags: HashMap::new(),
            position: Some(position),
        }
    }

    pub fn way(id: i64, node_refs: Vec<i64>) -> Self {
        Self {
            kind: ElementKind::Way,
            id,
            node_refs,
            tags: HashMap::new(),
            position: None,
        }
    }

    pub fn relation(id: i64) -> Self {
        Self {
            kind: ElementKind::Relation,
            id,
            node_refs: Vec::new(),
            tags: HashMap::new(),
            position: None,
        }
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    pub fn has_tag(&self, key: &str) -> bool {
        self.tags.contains_key(key)
    }
}

/// Physical outline requested for a building.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum BuildingShape {
    /// Rectangle: `length` along local north, `width` along local east,
    /// `rotation` in degrees clockwise from north.
    Rectangle { length: f64, width: f64, rotation: f64 },
    /// Legacy circular footprint, `size` is the diameter in meters.
    Circle { size: f64 },
}

impl BuildingShape {
    /// Half of the largest horizontal extent, in meters.
    pub fn half_extent(&self) -> f64 {
        match *self {
            BuildingShape::Rectangle { length, width, .. } => length.hypot(width) / 2.0,
            BuildingShape::Circle { size } => size / 2.0,
        }
    }

    pub fn has_positive_dimensions(&self) -> bool {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        match *self {
            BuildingShape::Rectangle {
                length,
                width,
                rotation,
            } => positive(length) && positive(width) && rotation.is_finite(),
            BuildingShape::Circle { size } => positive(size),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementQuery {
    pub center: GeoPoint,
    pub building_type: String,
    pub shape: BuildingShape,
}

impl PlacementQuery {
    pub fn rectangle(
        center: GeoPoint,
        building_type: impl Into<String>,
        length: f64,
        width: f64,
        rotation: f64,
    ) -> Self {
        Self {
            center,
            building_type: building_type.into(),
            shape: BuildingShape::Rectangle {
                length,
                width,
                rotation,
            },
        }
    }

    pub fn circle(center: GeoPoint, building_type: impl Into<String>, size: f64) -> Self {
        Self {
            center,
            building_type: building_type.into(),
            shape: BuildingShape::Circle { size },
        }
    }
}

/// Outcome of a placement decision. A denial always carries a reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Allowed,
    Denied(String),
}

impl Verdict {
    pub fn deny(reason: impl Into<String>) -> Self {
        Verdict::Denied(reason.into())
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Verdict::Allowed => None,
            Verdict::Denied(reason) => Some(reason),
        }
    }

    pub fn into_pair(self) -> (bool, Option<String>) {
        match self {
            Verdict::Allowed => (true, None),
            Verdict::Denied(reason) => (false, Some(reason)),
        }
    }
}
