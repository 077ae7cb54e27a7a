//! Great-circle distance gate for the office geofence.

/// Mean earth radius in meters, as used by common geodesy libraries.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine surface distance in meters between two lat/long pairs.
pub fn distance_m(lat1: f64, long1: f64, lat2: f64, long2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (long2 - long1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_M * a.sqrt().asin()
}

/// True iff the submitted coordinate lies within `radius_m` meters of the
/// office. A distance exactly equal to the radius passes. Missing or
/// non-finite coordinates fail closed: the caller gets `false`, never a
/// default "inside office".
pub fn within_office(
    latitude: Option<f64>,
    longitude: Option<f64>,
    office_lat: f64,
    office_long: f64,
    radius_m: f64,
) -> bool {
    let (lat, long) = match (latitude, longitude) {
        (Some(lat), Some(long)) => (lat, long),
        _ => return false,
    };

    if !lat.is_finite() || !long.is_finite() || lat.abs() > 90.0 || long.abs() > 180.0 {
        return false;
    }

    distance_m(lat, long, office_lat, office_long) <= radius_m
}

#[cfg(test)]
mod tests {
    use super::*;

    const OFFICE_LAT: f64 = 12.9716;
    const OFFICE_LONG: f64 = 77.5946;

    /// Degrees of latitude corresponding to `meters` of surface distance.
    fn lat_degrees(meters: f64) -> f64 {
        meters * 180.0 / (std::f64::consts::PI * EARTH_RADIUS_M)
    }

    #[test]
    fn coordinate_at_office_is_inside() {
        assert!(within_office(
            Some(OFFICE_LAT),
            Some(OFFICE_LONG),
            OFFICE_LAT,
            OFFICE_LONG,
            100.0
        ));
    }

    #[test]
    fn distance_along_meridian_matches_arc_length() {
        let d = distance_m(OFFICE_LAT + lat_degrees(100.0), OFFICE_LONG, OFFICE_LAT, OFFICE_LONG);
        assert!((d - 100.0).abs() < 1e-6, "got {d}");
    }

    #[test]
    fn boundary_distance_equal_to_radius_is_inside() {
        let lat = OFFICE_LAT + lat_degrees(100.0);
        // Pin the <= semantics: a radius exactly equal to the computed
        // distance passes, anything tighter fails.
        let d = distance_m(lat, OFFICE_LONG, OFFICE_LAT, OFFICE_LONG);
        assert!(within_office(Some(lat), Some(OFFICE_LONG), OFFICE_LAT, OFFICE_LONG, d));
        assert!(!within_office(Some(lat), Some(OFFICE_LONG), OFFICE_LAT, OFFICE_LONG, d - 1e-6));
    }

    #[test]
    fn hundred_and_one_meters_is_outside() {
        let lat = OFFICE_LAT + lat_degrees(101.0);
        assert!(!within_office(Some(lat), Some(OFFICE_LONG), OFFICE_LAT, OFFICE_LONG, 100.0));
    }

    #[test]
    fn missing_or_bogus_coordinates_fail_closed() {
        assert!(!within_office(None, Some(OFFICE_LONG), OFFICE_LAT, OFFICE_LONG, 100.0));
        assert!(!within_office(Some(OFFICE_LAT), None, OFFICE_LAT, OFFICE_LONG, 100.0));
        assert!(!within_office(Some(f64::NAN), Some(OFFICE_LONG), OFFICE_LAT, OFFICE_LONG, 100.0));
        assert!(!within_office(Some(91.0), Some(OFFICE_LONG), OFFICE_LAT, OFFICE_LONG, 100.0));
        assert!(!within_office(Some(OFFICE_LAT), Some(181.0), OFFICE_LAT, OFFICE_LONG, 100.0));
    }
}
