//! Meters <-> degrees conversion.
//!
//! Both scales are linearized around the given latitude, so results are
//! only meaningful for offsets of a few hundred meters. Latitude distances
//! always use the ellipsoidal series below. Longitude scales collapse to
//! zero at the poles; callers must keep latitudes away from +/-90.

const LAT_A: f64 = 111_132.92;
const LAT_B: f64 = 559.82;
const LAT_C: f64 = 1.175;
const LON_A: f64 = 111_412.84;
const LON_B: f64 = 93.5;

/// Meters spanned by one degree of latitude at `lat` degrees.
pub fn meters_per_degree_lat(lat: f64) -> f64 {
    let phi = lat.to_radians();
    LAT_A - LAT_B * (2.0 * phi).cos() + LAT_C * (4.0 * phi).cos()
}

/// Meters spanned by one degree of longitude at `lat` degrees.
pub fn meters_per_degree_lon(lat: f64) -> f64 {
    let phi = lat.to_radians();
    LON_A * phi.cos() - LON_B * (3.0 * phi).cos()
}

pub fn meters_to_degrees_lat(meters: f64, lat: f64) -> f64 {
    meters / meters_per_degree_lat(lat)
}

pub fn meters_to_degrees_lon(meters: f64, lat: f64) -> f64 {
    meters / meters_per_degree_lon(lat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latitude_scale_at_equator() {
        // 111132.92 - 559.82 + 1.175
        assert!((meters_per_degree_lat(0.0) - 110_574.275).abs() < 1e-6);
    }

    #[test]
    fn longitude_scale_shrinks_with_latitude() {
        let equator = meters_per_degree_lon(0.0);
        let moscow = meters_per_degree_lon(55.75);
        assert!((equator - (LON_A - LON_B)).abs() < 1e-6);
        assert!(moscow < equator / 1.5);
    }

    #[test]
    fn conversions_are_linear_in_meters() {
        let lat = 48.0;
        let one = meters_to_degrees_lat(100.0, lat);
        let two = meters_to_degrees_lat(200.0, lat);
        assert!((two - 2.0 * one).abs() < 1e-15);

        let lon = meters_to_degrees_lon(100.0, lat);
        assert!((lon * meters_per_degree_lon(lat) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn zero_meters_is_zero_degrees() {
        assert_eq!(meters_to_degrees_lat(0.0, 12.0), 0.0);
        assert_eq!(meters_to_degrees_lon(0.0, 12.0), 0.0);
    }
}
