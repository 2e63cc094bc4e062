use geo::{Area, Buffer, Distance, Euclidean, Intersects, LineString, MultiPolygon, Polygon, Validation};

/// Planar geometry operations the placement domain depends on.
///
/// All coordinates are (x = lon, y = lat) in degrees; distances and radii are
/// therefore in degrees too.
pub trait GeometryKernel: Send + Sync {
    /// True for a non-empty polygon with a simple, finite ring.
    fn is_valid_simple_polygon(&self, polygon: &Polygon<f64>) -> bool;

    fn is_valid_line(&self, line: &LineString<f64>) -> bool;

    fn intersects(&self, footprint: &Polygon<f64>, area: &MultiPolygon<f64>) -> bool;

    /// Area within `radius` of `line`.
    fn buffer_line(&self, line: &LineString<f64>, radius: f64) -> MultiPolygon<f64>;

    fn distance(&self, footprint: &Polygon<f64>, line: &LineString<f64>) -> f64;
}

/// `geo`-backed kernel.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlanarKernel;

impl GeometryKernel for PlanarKernel {
    fn is_valid_simple_polygon(&self, polygon: &Polygon<f64>) -> bool {
        polygon.is_valid() && polygon.unsigned_area() > 0.0
    }

    fn is_valid_line(&self, line: &LineString<f64>) -> bool {
        line.is_valid()
    }

    fn intersects(&self, footprint: &Polygon<f64>, area: &MultiPolygon<f64>) -> bool {
        footprint.intersects(area)
    }

    fn buffer_line(&self, line: &LineString<f64>, radius: f64) -> MultiPolygon<f64> {
        line.buffer(radius)
    }

    fn distance(&self, footprint: &Polygon<f64>, line: &LineString<f64>) -> f64 {
        Euclidean.distance(footprint, line)
    }
}
