use geo::{LineString, Polygon};
use geojson::{Feature, Geometry, JsonObject, Value};
use thiserror::Error;

use super::coordinates::{meters_to_degrees_lat, meters_to_degrees_lon};
use super::types::{BuildingShape, GeoPoint};

/// Vertex count used to approximate the legacy circular footprint.
pub const CIRCLE_SEGMENTS: usize = 32;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FootprintError {
    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),
}

/// Ground outline of a building in geodetic coordinates.
///
/// The vertex list is implicitly closed: the first vertex is not repeated.
#[derive(Debug, Clone, PartialEq)]
pub struct Footprint {
    vertices: Vec<GeoPoint>,
}

impl Footprint {
    /// Builds the rotated rectangle centered on `center`.
    ///
    /// `length` runs along local north and `width` along local east before
    /// rotation; `rotation` is in degrees, clockwise from north.
    pub fn rectangle(
        center: GeoPoint,
        length: f64,
        width: f64,
        rotation: f64,
    ) -> Result<Self, FootprintError> {
        if !(length.is_finite() && length > 0.0 && width.is_finite() && width > 0.0) {
            return Err(FootprintError::InvalidDimensions(format!(
                "length {} and width {} must be positive",
                length, width
            )));
        }
        if !rotation.is_finite() {
            return Err(FootprintError::InvalidDimensions(format!(
                "rotation {} is not a finite angle",
                rotation
            )));
        }

        let (hw, hl) = (width / 2.0, length / 2.0);
        let corners = [(-hw, -hl), (hw, -hl), (hw, hl), (-hw, hl)];

        // Local frame rotates counter-clockwise, the input angle is clockwise.
        let (sin, cos) = (-rotation).to_radians().sin_cos();
        let vertices = corners
            .iter()
            .map(|&(x, y)| {
                let rx = x * cos - y * sin;
                let ry = x * sin + y * cos;
                offset(center, rx, ry)
            })
            .collect();

        Ok(Self { vertices })
    }

    /// Builds the legacy circular footprint of diameter `size` meters.
    pub fn circle(center: GeoPoint, size: f64) -> Result<Self, FootprintError> {
        if !(size.is_finite() && size > 0.0) {
            return Err(FootprintError::InvalidDimensions(format!(
                "size {} must be positive",
                size
            )));
        }
        let radius = size / 2.0;
        let vertices = (0..CIRCLE_SEGMENTS)
            .map(|i| {
                let angle = std::f64::consts::TAU * i as f64 / CIRCLE_SEGMENTS as f64;
                offset(center, radius * angle.cos(), radius * angle.sin())
            })
            .collect();
        Ok(Self { vertices })
    }

    pub fn from_shape(center: GeoPoint, shape: &BuildingShape) -> Result<Self, FootprintError> {
        match *shape {
            BuildingShape::Rectangle {
                length,
                width,
                rotation,
            } => Self::rectangle(center, length, width, rotation),
            BuildingShape::Circle { size } => Self::circle(center, size),
        }
    }

    pub fn vertices(&self) -> &[GeoPoint] {
        &self.vertices
    }

    /// Closed planar polygon (x = lon, y = lat).
    pub fn to_polygon(&self) -> Polygon<f64> {
        let ring: LineString<f64> = self.vertices.iter().map(|p| p.to_coord()).collect();
        Polygon::new(ring, vec![])
    }

    /// GeoJSON feature of the outline, ring explicitly closed.
    pub fn to_geojson(&self) -> Feature {
        let mut ring: Vec<Vec<f64>> = self.vertices.iter().map(|p| vec![p.lon, p.lat]).collect();
        if let Some(first) = ring.first().cloned() {
            ring.push(first);
        }
        let mut properties = JsonObject::new();
        properties.insert("kind".to_string(), "footprint".into());
        Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::Polygon(vec![ring]))),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        }
    }
}

/// Shifts `center` by an east/north offset in meters.
fn offset(center: GeoPoint, east_m: f64, north_m: f64) -> GeoPoint {
    GeoPoint {
        lat: center.lat + meters_to_degrees_lat(north_m, center.lat),
        lon: center.lon + meters_to_degrees_lon(east_m, center.lat),
    }
}
