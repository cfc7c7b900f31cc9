//! Coordinate handling module
//!
//! Provides validated geographic coordinates and the quantized keys used to
//! group nearby lookups onto a single cache entry.

mod types;

pub use types::{
    CoordError, CoordKey, Coordinate, KEY_PRECISION, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON,
};

/// Validates and quantizes a latitude/longitude pair in one step.
///
/// # Arguments
///
/// * `lat` - Latitude in degrees (-90.0 to 90.0)
/// * `lon` - Longitude in degrees (-180.0 to 180.0)
///
/// # Returns
///
/// A `Result` containing the cache key or an error if inputs are invalid.
#[inline]
pub fn to_key(lat: f64, lon: f64) -> Result<CoordKey, CoordError> {
    Coordinate::new(lat, lon).map(|c| c.key())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_coordinate() {
        let coord = Coordinate::new(40.7128, -74.0060).unwrap();
        assert_eq!(coord.latitude, 40.7128);
        assert_eq!(coord.longitude, -74.0060);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        assert!(Coordinate::new(MAX_LAT, MAX_LON).is_ok());
        assert!(Coordinate::new(MIN_LAT, MIN_LON).is_ok());
    }

    #[test]
    fn test_invalid_latitude() {
        let result = Coordinate::new(90.5, 0.0);
        assert_eq!(result, Err(CoordError::InvalidLatitude(90.5)));
    }

    #[test]
    fn test_invalid_longitude() {
        let result = Coordinate::new(0.0, -181.0);
        assert_eq!(result, Err(CoordError::InvalidLongitude(-181.0)));
    }

    #[test]
    fn test_nan_is_rejected() {
        assert!(matches!(
            Coordinate::new(f64::NAN, 0.0),
            Err(CoordError::InvalidLatitude(_))
        ));
        assert!(matches!(
            Coordinate::new(0.0, f64::INFINITY),
            Err(CoordError::InvalidLongitude(_))
        ));
    }

    #[test]
    fn test_key_uses_four_decimals() {
        let key = to_key(48.856613, 2.352222).unwrap();
        assert_eq!(key.as_str(), "48.8566,2.3522");
    }

    #[test]
    fn test_nearby_points_share_key() {
        let a = to_key(12.971_60, 77.594_61).unwrap();
        let b = to_key(12.971_61, 77.594_64).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_distinct_points_have_distinct_keys() {
        let a = to_key(12.9716, 77.5946).unwrap();
        let b = to_key(12.9717, 77.5946).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_key_display_matches_as_str() {
        let key = to_key(-33.8688, 151.2093).unwrap();
        assert_eq!(key.to_string(), "-33.8688,151.2093");
    }

    #[test]
    fn test_coordinate_display() {
        let coord = Coordinate::new(1.5, -2.25).unwrap();
        assert_eq!(coord.to_string(), "1.5, -2.25");
    }

    // Property-based tests using proptest
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_points_near_grid_share_key(
                lat_steps in -899_999i64..=899_999,
                lon_steps in -1_799_999i64..=1_799_999,
                dlat in -0.00004..0.00004_f64,
                dlon in -0.00004..0.00004_f64,
            ) {
                // Around zero the sign of the offset shows up as "-0.0000".
                prop_assume!(lat_steps != 0 && lon_steps != 0);

                let lat = lat_steps as f64 / 10_000.0;
                let lon = lon_steps as f64 / 10_000.0;

                let grid = to_key(lat, lon).unwrap();
                let nearby = to_key(lat + dlat, lon + dlon).unwrap();
                prop_assert_eq!(grid, nearby);
            }

            #[test]
            fn test_key_has_four_decimals(
                lat in -90.0..=90.0_f64,
                lon in -180.0..=180.0_f64,
            ) {
                let key = to_key(lat, lon).unwrap();
                let parts: Vec<&str> = key.as_str().split(',').collect();
                prop_assert_eq!(parts.len(), 2);
                for part in parts {
                    let decimals = part.split_once('.').map(|(_, d)| d.len());
                    prop_assert_eq!(decimals, Some(KEY_PRECISION));
                }
            }
        }
    }
}
