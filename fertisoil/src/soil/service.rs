//! Soil enrichment service.
//!
//! Looks up soil data for a coordinate, caching every outcome under the
//! coordinate's quantized key.
//!
//! # Lookup flow
//!
//! ```text
//! Coordinate ─► CoordKey ─► cache hit? ──yes──► cached Arc<SoilResult>
//!                               │
//!                               no
//!                               ▼
//!                        SoilDataSource::fetch_properties
//!                               │
//!            ┌──────────────────┼─────────────────────┐
//!            ▼                  ▼                     ▼
//!      Ok(non-empty)        Ok(empty)               Err(_)
//!      classify, 0.8      Loamy, 0.0, []     Loamy, 0.1, ["Default"]
//!            └──────────────────┴─────────────────────┘
//!                               ▼
//!                          cache + return
//! ```
//!
//! Failed lookups are cached like successful ones, so a coordinate that
//! failed once is not fetched again until its entry is evicted. With the
//! default [`SoilCacheConfig`] nothing is ever evicted.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;
use tracing::{error, info, warn};

use super::result::SoilResult;
use crate::coord::{CoordKey, Coordinate};
use crate::provider::SoilDataSource;

/// Eviction policy for the soil result cache.
///
/// Both limits are off by default: the cache grows without bound and
/// entries live for the lifetime of the service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SoilCacheConfig {
    /// Maximum number of cached coordinates.
    pub max_entries: Option<u64>,
    /// Maximum age of a cached entry.
    pub time_to_live: Option<Duration>,
}

impl SoilCacheConfig {
    /// Set the maximum number of cached coordinates.
    pub fn with_max_entries(mut self, max_entries: u64) -> Self {
        self.max_entries = Some(max_entries);
        self
    }

    /// Set the maximum age of a cached entry.
    pub fn with_time_to_live(mut self, ttl: Duration) -> Self {
        self.time_to_live = Some(ttl);
        self
    }
}

/// Point-in-time cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SoilCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: u64,
}

/// Soil lookups with per-coordinate caching and fallback.
///
/// Safe to share between threads. Concurrent lookups of the same key are
/// coalesced: only one of them reaches the data source.
pub struct SoilDataService<S: SoilDataSource> {
    source: S,
    cache: Cache<CoordKey, Arc<SoilResult>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<S: SoilDataSource> SoilDataService<S> {
    /// Creates a service with an unbounded, never-evicting cache.
    pub fn new(source: S) -> Self {
        Self::with_cache_config(source, SoilCacheConfig::default())
    }

    /// Creates a service with the given eviction policy.
    pub fn with_cache_config(source: S, config: SoilCacheConfig) -> Self {
        let mut builder = Cache::<CoordKey, Arc<SoilResult>>::builder();
        if let Some(max_entries) = config.max_entries {
            builder = builder.max_capacity(max_entries);
        }
        if let Some(ttl) = config.time_to_live {
            builder = builder.time_to_live(ttl);
        }

        Self {
            source,
            cache: builder.build(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Returns soil data for a coordinate.
    ///
    /// Never fails. A cached result is returned as-is; otherwise the data
    /// source is queried once and whatever comes out, degraded or not, is
    /// cached and returned.
    pub fn get_soil_data(&self, coord: Coordinate) -> Arc<SoilResult> {
        let key = coord.key();
        let entry = self
            .cache
            .entry(key.clone())
            .or_insert_with(|| Arc::new(self.lookup(coord, &key)));

        if entry.is_fresh() {
            self.misses.fetch_add(1, Ordering::Relaxed);
        } else {
            self.hits.fetch_add(1, Ordering::Relaxed);
            info!(key = %key, "Returning cached soil data");
        }

        entry.into_value()
    }

    /// Name of the underlying data source.
    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Number of cached coordinates.
    pub fn len(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns current cache counters.
    pub fn stats(&self) -> SoilCacheStats {
        self.cache.run_pending_tasks();
        SoilCacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.cache.entry_count(),
        }
    }

    fn lookup(&self, coord: Coordinate, key: &CoordKey) -> SoilResult {
        let mut result = SoilResult::pending(coord);

        match self.source.fetch_properties(&coord) {
            Ok(properties) if properties.is_empty() => {
                warn!(
                    key = %key,
                    source = self.source.name(),
                    "Soil data source returned no properties"
                );
            }
            Ok(properties) => {
                result.apply_fetch(self.source.name(), properties);
                info!(
                    key = %key,
                    source = self.source.name(),
                    texture = %result.texture_class,
                    "Fetched soil data"
                );
            }
            Err(e) => {
                error!(
                    key = %key,
                    source = self.source.name(),
                    error = %e,
                    "Error fetching soil data, using default"
                );
                result.degrade();
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderError;
    use crate::soil::{SoilProperties, SoilProperty, TextureClass};
    use std::sync::atomic::AtomicUsize;

    struct MockSource {
        response: Result<SoilProperties, ProviderError>,
        calls: AtomicUsize,
    }

    impl MockSource {
        fn new(response: Result<SoilProperties, ProviderError>) -> Self {
            Self {
                response,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl SoilDataSource for MockSource {
        fn fetch_properties(&self, _coord: &Coordinate) -> Result<SoilProperties, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response.clone()
        }

        fn name(&self) -> &str {
            "SoilGrids"
        }
    }

    fn loam_sample() -> SoilProperties {
        [
            (SoilProperty::Clay, 300.0),
            (SoilProperty::Sand, 400.0),
            (SoilProperty::Silt, 300.0),
            (SoilProperty::Nitrogen, 150.0),
        ]
        .into_iter()
        .collect()
    }

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn test_live_fetch() {
        let service = SoilDataService::new(MockSource::new(Ok(loam_sample())));
        let result = service.get_soil_data(coord(12.9716, 77.5946));

        assert!(result.success);
        assert_eq!(result.confidence, 0.8);
        assert_eq!(result.sources, vec!["SoilGrids".to_string()]);
        assert_eq!(result.texture_class, TextureClass::ClayLoam);
        assert_eq!(result.properties.get(SoilProperty::Nitrogen), Some(150.0));
    }

    #[test]
    fn test_cached_lookup_skips_fetch() {
        let source = Arc::new(MockSource::new(Ok(loam_sample())));
        let service = SoilDataService::new(Arc::clone(&source));

        let first = service.get_soil_data(coord(12.971_60, 77.594_61));
        let second = service.get_soil_data(coord(12.971_64, 77.594_63));

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(source.calls(), 1);

        let stats = service.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
    }

    #[test]
    fn test_distinct_keys_fetch_separately() {
        let source = Arc::new(MockSource::new(Ok(loam_sample())));
        let service = SoilDataService::new(Arc::clone(&source));

        service.get_soil_data(coord(10.0, 20.0));
        service.get_soil_data(coord(10.0001, 20.0));

        assert_eq!(source.calls(), 2);
        assert_eq!(service.len(), 2);
        assert!(!service.is_empty());
    }

    #[test]
    fn test_fetch_error_degrades() {
        let service = SoilDataService::new(MockSource::new(Err(ProviderError::Timeout(
            "15s elapsed".to_string(),
        ))));
        let result = service.get_soil_data(coord(0.0, 0.0));

        assert_eq!(result.texture_class, TextureClass::Loamy);
        assert_eq!(result.confidence, 0.1);
        assert_eq!(result.sources, vec!["Default".to_string()]);
        assert!(!result.success);
        assert!(result.properties.is_empty());
    }

    #[test]
    fn test_failed_lookup_is_cached() {
        let source = Arc::new(MockSource::new(Err(ProviderError::HttpError(
            "HTTP 503".to_string(),
        ))));
        let service = SoilDataService::new(Arc::clone(&source));

        let first = service.get_soil_data(coord(51.5074, -0.1278));
        let second = service.get_soil_data(coord(51.5074, -0.1278));

        assert!(first.is_degraded());
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(source.calls(), 1);
    }

    #[test]
    fn test_empty_fetch_keeps_defaults() {
        let service = SoilDataService::new(MockSource::new(Ok(SoilProperties::new())));
        let result = service.get_soil_data(coord(-33.8688, 151.2093));

        assert_eq!(result.texture_class, TextureClass::Loamy);
        assert_eq!(result.confidence, 0.0);
        assert!(result.sources.is_empty());
        assert!(!result.success);
    }

    #[test]
    fn test_unclassifiable_properties_give_loamy_but_live() {
        let props: SoilProperties = [(SoilProperty::Clay, f64::NAN)].into_iter().collect();
        let service = SoilDataService::new(MockSource::new(Ok(props)));
        let result = service.get_soil_data(coord(1.0, 1.0));

        assert!(result.success);
        assert_eq!(result.confidence, 0.8);
        assert_eq!(result.texture_class, TextureClass::Loamy);
    }

    #[test]
    fn test_source_name() {
        let service = SoilDataService::new(MockSource::new(Ok(SoilProperties::new())));
        assert_eq!(service.source_name(), "SoilGrids");
    }

    #[test]
    fn test_cache_config_builder() {
        let config = SoilCacheConfig::default()
            .with_max_entries(1000)
            .with_time_to_live(Duration::from_secs(3600));
        assert_eq!(config.max_entries, Some(1000));
        assert_eq!(config.time_to_live, Some(Duration::from_secs(3600)));
        assert_eq!(SoilCacheConfig::default().max_entries, None);
    }

    #[test]
    fn test_expired_entry_is_fetched_again() {
        let source = Arc::new(MockSource::new(Ok(loam_sample())));
        let service = SoilDataService::with_cache_config(
            Arc::clone(&source),
            SoilCacheConfig::default().with_time_to_live(Duration::from_millis(50)),
        );

        let first = service.get_soil_data(coord(10.0, 20.0));
        service.get_soil_data(coord(10.0, 20.0));
        assert_eq!(source.calls(), 1);

        std::thread::sleep(Duration::from_millis(150));

        let refreshed = service.get_soil_data(coord(10.0, 20.0));
        assert_eq!(source.calls(), 2);
        assert!(!Arc::ptr_eq(&first, &refreshed));
    }

    #[test]
    fn test_capacity_bound_forces_refetch() {
        let source = Arc::new(MockSource::new(Ok(loam_sample())));
        let service = SoilDataService::with_cache_config(
            Arc::clone(&source),
            SoilCacheConfig::default().with_max_entries(1),
        );

        service.get_soil_data(coord(10.0, 20.0));
        service.get_soil_data(coord(11.0, 21.0));
        assert_eq!(source.calls(), 2);
        assert!(service.len() <= 1);

        // At most one of the two keys survived, so one of them is fetched again.
        service.get_soil_data(coord(10.0, 20.0));
        service.get_soil_data(coord(11.0, 21.0));
        assert!(source.calls() >= 3);
    }

    #[test]
    fn test_concurrent_lookups_fetch_once() {
        let source = Arc::new(MockSource::new(Ok(loam_sample())));
        let service = Arc::new(SoilDataService::new(Arc::clone(&source)));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let service = Arc::clone(&service);
                std::thread::spawn(move || service.get_soil_data(coord(45.0, 7.0)))
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(source.calls(), 1);
        assert!(results.iter().all(|r| Arc::ptr_eq(r, &results[0])));
    }
}
