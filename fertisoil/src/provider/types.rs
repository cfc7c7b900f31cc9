//! Provider traits and error types.

use std::sync::Arc;

use thiserror::Error;

use crate::coord::Coordinate;
use crate::location::LocationInfo;
use crate::soil::SoilProperties;

/// Errors that can occur while talking to an external data service.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    /// Transport failure or non-success HTTP status.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// The request did not complete within the configured timeout.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The request URL could not be built.
    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),

    /// The response body could not be decoded.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// A source of raw soil properties for a coordinate.
///
/// Implementations return whatever subset of properties the upstream
/// service reports. An empty map is a valid answer and is not an error.
pub trait SoilDataSource: Send + Sync {
    /// Fetches soil properties at the shallowest available depth.
    fn fetch_properties(&self, coord: &Coordinate) -> Result<SoilProperties, ProviderError>;

    /// Provenance tag recorded on results built from this source.
    fn name(&self) -> &str;
}

/// A reverse-geocoding service.
pub trait LocationLookup: Send + Sync {
    /// Resolves a coordinate into place names.
    fn lookup(&self, coord: &Coordinate) -> Result<LocationInfo, ProviderError>;

    /// Human-readable name of the service.
    fn name(&self) -> &str;
}

impl<T: SoilDataSource + ?Sized> SoilDataSource for Arc<T> {
    fn fetch_properties(&self, coord: &Coordinate) -> Result<SoilProperties, ProviderError> {
        (**self).fetch_properties(coord)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<T: LocationLookup + ?Sized> LocationLookup for Arc<T> {
    fn lookup(&self, coord: &Coordinate) -> Result<LocationInfo, ProviderError> {
        (**self).lookup(coord)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
