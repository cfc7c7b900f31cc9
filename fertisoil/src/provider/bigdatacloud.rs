//! BigDataCloud reverse-geocoding provider.
//!
//! Uses the free client-side reverse geocode endpoint.
//!
//! # URL Pattern
//!
//! `https://api.bigdatacloud.net/data/reverse-geocode-client?latitude={lat}&longitude={lon}&localityLanguage=en`
//!
//! - No authentication required
//! - Missing fields in the response are treated as empty strings

use std::time::Duration;

use serde::Deserialize;

use super::http::build_url;
use crate::coord::Coordinate;
use crate::location::LocationInfo;
use crate::provider::{HttpClient, LocationLookup, ProviderError};

/// Reverse-geocode endpoint.
pub const BIGDATACLOUD_BASE_URL: &str = "https://api.bigdatacloud.net/data/reverse-geocode-client";

/// Request timeout for reverse-geocode queries.
pub const BIGDATACLOUD_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ReverseGeocodeResponse {
    city: String,
    locality: String,
    principal_subdivision: String,
    country_name: String,
    locality_info: LocalityInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LocalityInfo {
    informative: Vec<serde_json::Value>,
}

impl From<ReverseGeocodeResponse> for LocationInfo {
    fn from(response: ReverseGeocodeResponse) -> Self {
        LocationInfo {
            city: response.city,
            locality: response.locality,
            region: response.principal_subdivision,
            country: response.country_name,
            formatted_address: response.locality_info.informative,
        }
    }
}

/// BigDataCloud location lookup.
pub struct BigDataCloudProvider<C: HttpClient> {
    http_client: C,
    base_url: String,
}

impl<C: HttpClient> BigDataCloudProvider<C> {
    /// Creates a provider against the public endpoint.
    pub fn new(http_client: C) -> Self {
        Self::with_base_url(http_client, BIGDATACLOUD_BASE_URL)
    }

    /// Creates a provider against a custom endpoint.
    pub fn with_base_url(http_client: C, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
        }
    }

    fn build_url(&self, coord: &Coordinate) -> Result<String, ProviderError> {
        build_url(
            &self.base_url,
            &[
                ("latitude", coord.latitude.to_string()),
                ("longitude", coord.longitude.to_string()),
                ("localityLanguage", "en".to_string()),
            ],
        )
    }
}

impl<C: HttpClient> LocationLookup for BigDataCloudProvider<C> {
    fn lookup(&self, coord: &Coordinate) -> Result<LocationInfo, ProviderError> {
        let url = self.build_url(coord)?;
        let body = self.http_client.get(&url)?;

        let response: ReverseGeocodeResponse = serde_json::from_slice(&body)
            .map_err(|e| ProviderError::InvalidResponse(format!("BigDataCloud: {}", e)))?;

        Ok(response.into())
    }

    fn name(&self) -> &str {
        "BigDataCloud"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockHttpClient;

    fn coord() -> Coordinate {
        Coordinate::new(48.8566, 2.3522).unwrap()
    }

    #[test]
    fn test_url_construction() {
        let provider = BigDataCloudProvider::new(MockHttpClient::ok("{}"));
        assert_eq!(
            provider.build_url(&coord()).unwrap(),
            "https://api.bigdatacloud.net/data/reverse-geocode-client\
             ?latitude=48.8566&longitude=2.3522&localityLanguage=en"
        );
    }

    #[test]
    fn test_lookup_maps_fields() {
        let body = r#"{
            "latitude": 48.8566,
            "longitude": 2.3522,
            "city": "Paris",
            "locality": "Paris 4e Arrondissement",
            "principalSubdivision": "Île-de-France",
            "countryName": "France",
            "localityInfo": {
                "administrative": [{"name": "France", "order": 2}],
                "informative": [
                    {"name": "Europe", "description": "continent", "order": 1},
                    {"name": "Seine", "description": "river", "order": 9}
                ]
            }
        }"#;
        let provider = BigDataCloudProvider::new(MockHttpClient::ok(body));
        let info = provider.lookup(&coord()).unwrap();

        assert_eq!(info.city, "Paris");
        assert_eq!(info.locality, "Paris 4e Arrondissement");
        assert_eq!(info.region, "Île-de-France");
        assert_eq!(info.country, "France");
        assert_eq!(info.formatted_address.len(), 2);
        assert_eq!(info.formatted_address[1]["name"], "Seine");
    }

    #[test]
    fn test_lookup_tolerates_missing_fields() {
        let provider = BigDataCloudProvider::new(MockHttpClient::ok(r#"{"countryName": "Chad"}"#));
        let info = provider.lookup(&coord()).unwrap();
        assert_eq!(info.country, "Chad");
        assert!(info.city.is_empty());
        assert!(info.formatted_address.is_empty());
    }

    #[test]
    fn test_lookup_malformed_body() {
        let provider = BigDataCloudProvider::new(MockHttpClient::ok("not json"));
        assert!(matches!(
            provider.lookup(&coord()),
            Err(ProviderError::InvalidResponse(_))
        ));
    }
}
