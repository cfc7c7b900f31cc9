//! Integration tests for soil and location enrichment.
//!
//! These tests drive the public services end to end with a scripted HTTP
//! client in place of the network:
//! - SoilGrids response → texture class, confidence and provenance
//! - Coordinate cache coalescing at 4 decimal places
//! - Fetch failure → cached fallback result
//! - BigDataCloud response → location fields
//!
//! Run with: `cargo test --test soil_enrichment_integration`

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use fertisoil::coord::Coordinate;
use fertisoil::location::LocationService;
use fertisoil::provider::{
    BigDataCloudProvider, HttpClient, ProviderError, SoilGridsProvider,
};
use fertisoil::soil::{SoilDataService, SoilProperty, TextureClass};

// ============================================================================
// Helper Functions
// ============================================================================

/// HTTP client that replays queued responses and counts requests.
struct ScriptedClient {
    responses: Mutex<VecDeque<Result<Vec<u8>, ProviderError>>>,
    requests: Arc<AtomicUsize>,
}

impl ScriptedClient {
    fn new(responses: Vec<Result<&str, ProviderError>>) -> (Self, Arc<AtomicUsize>) {
        let requests = Arc::new(AtomicUsize::new(0));
        let client = Self {
            responses: Mutex::new(
                responses
                    .into_iter()
                    .map(|r| r.map(|body| body.as_bytes().to_vec()))
                    .collect(),
            ),
            requests: Arc::clone(&requests),
        };
        (client, requests)
    }
}

impl HttpClient for ScriptedClient {
    fn get(&self, _url: &str) -> Result<Vec<u8>, ProviderError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::HttpError("no scripted response".into())))
    }
}

/// SoilGrids body with clay 30%, sand 40%, silt 30% in the top layer.
const LOAM_BODY: &str = r#"{
    "type": "Feature",
    "properties": { "layers": [
        { "name": "clay", "depths": [
            { "label": "0-5cm", "values": { "mean": 300 } },
            { "label": "5-15cm", "values": { "mean": 320 } } ] },
        { "name": "sand", "depths": [ { "label": "0-5cm", "values": { "mean": 400 } } ] },
        { "name": "silt", "depths": [ { "label": "0-5cm", "values": { "mean": 300 } } ] },
        { "name": "phh2o", "depths": [ { "label": "0-5cm", "values": { "mean": 62 } } ] },
        { "name": "soc", "depths": [ { "label": "0-5cm", "values": { "mean": null } } ] }
    ] }
}"#;

fn nairobi() -> Coordinate {
    Coordinate::new(-1.286389, 36.817223).unwrap()
}

// ============================================================================
// Integration Tests
// ============================================================================

#[test]
fn test_soilgrids_response_is_classified() {
    let (client, _) = ScriptedClient::new(vec![Ok(LOAM_BODY)]);
    let service = SoilDataService::new(SoilGridsProvider::new(client));

    let result = service.get_soil_data(nairobi());

    assert!(result.success);
    assert_eq!(result.texture_class, TextureClass::ClayLoam);
    assert_eq!(result.confidence, 0.8);
    assert_eq!(result.sources, vec!["SoilGrids".to_string()]);
    assert_eq!(result.properties.get(SoilProperty::Clay), Some(300.0));
    assert_eq!(result.properties.get(SoilProperty::PhWater), Some(62.0));
    assert_eq!(result.properties.get(SoilProperty::OrganicCarbon), None);
}

#[test]
fn test_nearby_coordinates_share_one_fetch() {
    let (client, requests) = ScriptedClient::new(vec![Ok(LOAM_BODY)]);
    let service = SoilDataService::new(SoilGridsProvider::new(client));

    let first = service.get_soil_data(Coordinate::new(12.34561, 45.67891).unwrap());
    let second = service.get_soil_data(Coordinate::new(12.34564, 45.67889).unwrap());

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(requests.load(Ordering::SeqCst), 1);

    let stats = service.stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.entries, 1);
}

#[test]
fn test_fetch_failure_is_degraded_and_cached() {
    let (client, requests) = ScriptedClient::new(vec![
        Err(ProviderError::Timeout("15s elapsed".into())),
        Ok(LOAM_BODY),
    ]);
    let service = SoilDataService::new(SoilGridsProvider::new(client));

    let first = service.get_soil_data(nairobi());
    assert!(!first.success);
    assert_eq!(first.texture_class, TextureClass::Loamy);
    assert_eq!(first.confidence, 0.1);
    assert_eq!(first.sources, vec!["Default".to_string()]);

    let again = service.get_soil_data(nairobi());
    assert!(Arc::ptr_eq(&first, &again));
    assert_eq!(requests.load(Ordering::SeqCst), 1);
}

#[test]
fn test_malformed_body_is_degraded() {
    let (client, _) = ScriptedClient::new(vec![Ok("<html>gateway error</html>")]);
    let service = SoilDataService::new(SoilGridsProvider::new(client));

    let result = service.get_soil_data(nairobi());
    assert!(result.is_degraded());
    assert_eq!(result.texture_class, TextureClass::Loamy);
}

#[test]
fn test_location_lookup() {
    let body = r#"{
        "city": "Nairobi",
        "locality": "Westlands",
        "principalSubdivision": "Nairobi County",
        "countryName": "Kenya",
        "localityInfo": { "informative": [ { "name": "Africa", "order": 1 } ] }
    }"#;
    let (client, _) = ScriptedClient::new(vec![Ok(body)]);
    let service = LocationService::new(BigDataCloudProvider::new(client));

    let info = service.get_location_info(nairobi());
    assert_eq!(info.city, "Nairobi");
    assert_eq!(info.region, "Nairobi County");
    assert_eq!(info.country, "Kenya");
    assert_eq!(info.formatted_address.len(), 1);
}

#[test]
fn test_location_failure_returns_empty_info() {
    let (client, _) = ScriptedClient::new(vec![Err(ProviderError::HttpError(
        "HTTP 503".into(),
    ))]);
    let service = LocationService::new(BigDataCloudProvider::new(client));

    assert!(service.get_location_info(nairobi()).is_empty());
}
