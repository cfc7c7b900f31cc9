//! Location enrichment.
//!
//! Resolves a coordinate into place names. Lookups are best-effort: any
//! failure yields an all-empty [`LocationInfo`] and is only visible in the
//! logs.

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::coord::Coordinate;
use crate::provider::LocationLookup;

/// Place names for a coordinate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationInfo {
    pub city: String,
    pub locality: String,
    pub region: String,
    pub country: String,
    /// Free-form descriptive entries (continent, rivers, time zone, ...).
    pub formatted_address: Vec<serde_json::Value>,
}

impl LocationInfo {
    /// True when no field carries any information.
    pub fn is_empty(&self) -> bool {
        self.city.is_empty()
            && self.locality.is_empty()
            && self.region.is_empty()
            && self.country.is_empty()
            && self.formatted_address.is_empty()
    }
}

/// Best-effort location lookups.
pub struct LocationService<L: LocationLookup> {
    lookup: L,
}

impl<L: LocationLookup> LocationService<L> {
    pub fn new(lookup: L) -> Self {
        Self { lookup }
    }

    /// Returns place names for a coordinate, or an empty structure on failure.
    pub fn get_location_info(&self, coord: Coordinate) -> LocationInfo {
        match self.lookup.lookup(&coord) {
            Ok(location) => {
                info!(
                    lat = coord.latitude,
                    lon = coord.longitude,
                    city = %location.city,
                    country = %location.country,
                    "Resolved location"
                );
                location
            }
            Err(e) => {
                error!(
                    lat = coord.latitude,
                    lon = coord.longitude,
                    service = self.lookup.name(),
                    error = %e,
                    "Error getting location info"
                );
                LocationInfo::default()
            }
        }
    }
}
