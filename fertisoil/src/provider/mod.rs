//! External data provider abstraction
//!
//! This module provides traits and implementations for the external
//! services the enrichment pipeline talks to: soil property sources
//! (ISRIC SoilGrids) and reverse geocoders (BigDataCloud).
//!
//! All providers are generic over [`HttpClient`] so tests can inject a
//! mock client instead of hitting the network.
//!
//! ```ignore
//! use fertisoil::provider::{BigDataCloudProvider, ReqwestClient, BIGDATACLOUD_TIMEOUT};
//!
//! let http_client = ReqwestClient::with_timeout(BIGDATACLOUD_TIMEOUT)?;
//! let geocoder = BigDataCloudProvider::new(http_client);
//! ```

mod bigdatacloud;
mod http;
mod soilgrids;
mod types;

pub use bigdatacloud::{BigDataCloudProvider, BIGDATACLOUD_BASE_URL, BIGDATACLOUD_TIMEOUT};
pub use http::{HttpClient, ReqwestClient, DEFAULT_TIMEOUT};
pub use soilgrids::{SoilGridsProvider, SOILGRIDS_BASE_URL, SOILGRIDS_TIMEOUT};
pub use types::{LocationLookup, ProviderError, SoilDataSource};

#[cfg(test)]
pub use http::tests::MockHttpClient;
