//! Great-circle distance on a spherical Earth.

use geotour_types::Coordinates;

/// Mean Earth radius in meters used by the haversine formula.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine distance in meters between two points given in degrees.
///
/// Identical points yield `0.0`. The result is symmetric in its arguments.
pub fn haversine_distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    // Rounding can push `a` a hair above 1 for antipodal points.
    let c = 2.0 * a.min(1.0).sqrt().asin();

    EARTH_RADIUS_M * c
}

/// Haversine distance in meters between two coordinate pairs.
pub fn distance_between(a: Coordinates, b: Coordinates) -> f64 {
    haversine_distance(a.lat, a.lng, b.lat, b.lng)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE_M: f64 = 1e-6;

    #[test]
    fn identical_points_are_zero() {
        let d = haversine_distance(25.5948, 85.1385, 25.5948, 85.1385);
        assert!(d.abs() < TOLERANCE_M, "expected 0, got {d}");
    }

    #[test]
    fn distance_is_symmetric() {
        let ab = haversine_distance(25.5948, 85.1385, 25.5932, 85.1392);
        let ba = haversine_distance(25.5932, 85.1392, 25.5948, 85.1385);
        assert!((ab - ba).abs() < TOLERANCE_M);
    }

    #[test]
    fn nine_thousandths_of_a_degree_is_about_a_kilometer() {
        let d = haversine_distance(0.0, 0.0, 0.009, 0.0);
        assert!((d - 1000.0).abs() < 10.0, "expected ~1000m, got {d}");
        // Exact arc length for a meridian step on the sphere.
        let expected = EARTH_RADIUS_M * 0.009_f64.to_radians();
        assert!((d - expected).abs() < 1.0);
    }

    #[test]
    fn one_degree_of_longitude_at_equator() {
        let d = distance_between(Coordinates::new(0.0, 0.0), Coordinates::new(0.0, 1.0));
        assert!((d - 111_194.93).abs() < 1.0, "got {d}");
    }

    #[test]
    fn campus_stops_are_a_few_hundred_meters_apart() {
        // Library to SAC Hall on the IIT Patna campus.
        let d = haversine_distance(25.5948, 85.1385, 25.5932, 85.1392);
        assert!(d > 150.0 && d < 250.0, "got {d}");
    }

    #[test]
    fn antipodal_points_are_half_circumference() {
        let d = haversine_distance(0.0, 0.0, 0.0, 180.0);
        let half = EARTH_RADIUS_M * core::f64::consts::PI;
        assert!((d - half).abs() < 1.0);
    }
}
