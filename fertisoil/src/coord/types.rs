//! Coordinate types.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum valid latitude in degrees.
pub const MIN_LAT: f64 = -90.0;

/// Maximum valid latitude in degrees.
pub const MAX_LAT: f64 = 90.0;

/// Minimum valid longitude in degrees.
pub const MIN_LON: f64 = -180.0;

/// Maximum valid longitude in degrees.
pub const MAX_LON: f64 = 180.0;

/// Number of decimal places kept when quantizing a coordinate into a cache key.
///
/// Four decimals is roughly 11 m at the equator.
pub const KEY_PRECISION: usize = 4;

/// Errors that can occur when constructing a coordinate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordError {
    /// Latitude is outside [-90, 90] or not a finite number.
    #[error("Invalid latitude: {0} (must be between -90 and 90)")]
    InvalidLatitude(f64),

    /// Longitude is outside [-180, 180] or not a finite number.
    #[error("Invalid longitude: {0} (must be between -180 and 180)")]
    InvalidLongitude(f64),
}

/// A validated WGS84 geographic coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate, validating both components.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordError> {
        if !latitude.is_finite() || !(MIN_LAT..=MAX_LAT).contains(&latitude) {
            return Err(CoordError::InvalidLatitude(latitude));
        }
        if !longitude.is_finite() || !(MIN_LON..=MAX_LON).contains(&longitude) {
            return Err(CoordError::InvalidLongitude(longitude));
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Quantizes this coordinate into a cache key.
    #[inline]
    pub fn key(&self) -> CoordKey {
        CoordKey::from(*self)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

/// A coordinate rounded to [`KEY_PRECISION`] decimal places.
///
/// Rendered as `"{lat},{lon}"`, e.g. `"48.8566,2.3522"`. Two coordinates
/// that render to the same string share a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CoordKey(String);

impl CoordKey {
    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<Coordinate> for CoordKey {
    fn from(coord: Coordinate) -> Self {
        CoordKey(format!(
            "{:.prec$},{:.prec$}",
            coord.latitude,
            coord.longitude,
            prec = KEY_PRECISION
        ))
    }
}

impl fmt::Display for CoordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
