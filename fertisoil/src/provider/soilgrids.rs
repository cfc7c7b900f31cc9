//! ISRIC SoilGrids soil property provider.
//!
//! Queries the SoilGrids v2.0 REST API for mean property values and keeps
//! the shallowest depth band reported for each property.
//!
//! # URL Pattern
//!
//! `https://rest.isric.org/soilgrids/v2.0/properties/query?lon={lon}&lat={lat}&property=clay&...&depth=0-5cm&depth=5-15cm&value=mean`
//!
//! - No authentication required
//! - Global coverage at 250 m resolution; open water and ice return nulls
//!
//! # Response shape
//!
//! ```text
//! { "properties": { "layers": [
//!     { "name": "clay",
//!       "depths": [ { "label": "0-5cm", "values": { "mean": 215 } }, ... ] },
//!     ...
//! ] } }
//! ```
//!
//! A flat `"properties": [ <layer>, ... ]` array is accepted as well.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info};

use super::http::build_url;
use crate::coord::Coordinate;
use crate::provider::{HttpClient, ProviderError, SoilDataSource};
use crate::soil::{SoilProperties, SoilProperty};

/// SoilGrids property query endpoint.
pub const SOILGRIDS_BASE_URL: &str = "https://rest.isric.org/soilgrids/v2.0/properties/query";

/// Request timeout for SoilGrids queries.
pub const SOILGRIDS_TIMEOUT: Duration = Duration::from_secs(15);

/// Depth bands requested, shallowest first.
const DEPTHS: [&str; 2] = ["0-5cm", "5-15cm"];

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    properties: Option<PropertiesField>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PropertiesField {
    Layered { layers: Vec<Layer> },
    Flat(Vec<Layer>),
}

#[derive(Debug, Deserialize)]
struct Layer {
    name: String,
    #[serde(default)]
    depths: Vec<Depth>,
}

#[derive(Debug, Deserialize)]
struct Depth {
    #[serde(default)]
    values: DepthValues,
}

#[derive(Debug, Default, Deserialize)]
struct DepthValues {
    mean: Option<f64>,
}

/// SoilGrids soil data source.
///
/// # Example
///
/// ```ignore
/// use fertisoil::provider::{ReqwestClient, SoilGridsProvider, SOILGRIDS_TIMEOUT};
///
/// let client = ReqwestClient::with_timeout(SOILGRIDS_TIMEOUT).unwrap();
/// let provider = SoilGridsProvider::new(client);
/// ```
pub struct SoilGridsProvider<C: HttpClient> {
    http_client: C,
    base_url: String,
}

impl<C: HttpClient> SoilGridsProvider<C> {
    /// Creates a provider against the public SoilGrids endpoint.
    pub fn new(http_client: C) -> Self {
        Self::with_base_url(http_client, SOILGRIDS_BASE_URL)
    }

    /// Creates a provider against a custom endpoint (mirrors, proxies).
    pub fn with_base_url(http_client: C, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
        }
    }

    /// Builds the query URL for the given coordinate.
    fn build_url(&self, coord: &Coordinate) -> Result<String, ProviderError> {
        let mut params: Vec<(&str, String)> = vec![
            ("lon", coord.longitude.to_string()),
            ("lat", coord.latitude.to_string()),
        ];
        params.extend(
            SoilProperty::ALL
                .iter()
                .map(|p| ("property", p.as_str().to_string())),
        );
        params.extend(DEPTHS.iter().map(|d| ("depth", d.to_string())));
        params.push(("value", "mean".to_string()));

        build_url(&self.base_url, &params)
    }

    /// Extracts the shallowest mean value for each layer.
    fn parse(body: &[u8]) -> Result<SoilProperties, ProviderError> {
        let response: QueryResponse = serde_json::from_slice(body)
            .map_err(|e| ProviderError::InvalidResponse(format!("SoilGrids: {}", e)))?;

        let layers = match response.properties {
            Some(PropertiesField::Layered { layers }) => layers,
            Some(PropertiesField::Flat(layers)) => layers,
            None => Vec::new(),
        };

        let mut properties = SoilProperties::new();
        for layer in layers {
            match layer.depths.first().and_then(|d| d.values.mean) {
                Some(mean) => properties.insert(layer.name, mean),
                None => debug!(property = %layer.name, "No surface value reported"),
            }
        }

        Ok(properties)
    }
}

impl<C: HttpClient> SoilDataSource for SoilGridsProvider<C> {
    fn fetch_properties(&self, coord: &Coordinate) -> Result<SoilProperties, ProviderError> {
        let url = self.build_url(coord)?;
        info!(
            lat = coord.latitude,
            lon = coord.longitude,
            "Fetching SoilGrids data"
        );

        let body = self.http_client.get(&url)?;
        let properties = Self::parse(&body)?;

        debug!(?properties, "Fetched SoilGrids data");
        Ok(properties)
    }

    fn name(&self) -> &str {
        "SoilGrids"
    }
}
