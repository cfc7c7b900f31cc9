//! Soil lookup results.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::properties::SoilProperties;
use super::texture::{self, TextureClass};
use crate::coord::Coordinate;

/// Confidence assigned to results built from a live fetch.
pub const LIVE_CONFIDENCE: f64 = 0.8;

/// Confidence assigned to results degraded after a failed fetch.
pub const FALLBACK_CONFIDENCE: f64 = 0.1;

/// Provenance tag recorded on degraded results.
pub const DEFAULT_SOURCE: &str = "Default";

/// Where and when a lookup was made.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: DateTime<Local>,
}

/// Outcome of a soil lookup.
///
/// Callers tell live data from fallback data through `success`,
/// `confidence` and `sources`:
///
/// | state    | texture_class | confidence | sources        | success |
/// |----------|---------------|------------|----------------|---------|
/// | live     | classified    | 0.8        | `[<source>]`   | true    |
/// | empty    | Loamy         | 0.0        | `[]`           | false   |
/// | degraded | Loamy         | 0.1        | `["Default"]`  | false   |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilResult {
    pub location: LookupLocation,
    pub properties: SoilProperties,
    pub texture_class: TextureClass,
    pub confidence: f64,
    pub sources: Vec<String>,
    pub success: bool,
}

impl SoilResult {
    /// A fresh result before any data has been fetched.
    pub fn pending(coord: Coordinate) -> Self {
        Self {
            location: LookupLocation {
                latitude: coord.latitude,
                longitude: coord.longitude,
                timestamp: Local::now(),
            },
            properties: SoilProperties::new(),
            texture_class: TextureClass::Loamy,
            confidence: 0.0,
            sources: Vec::new(),
            success: false,
        }
    }

    /// Merges fetched properties in and reclassifies the texture.
    ///
    /// An empty property set leaves the result untouched.
    pub(crate) fn apply_fetch(&mut self, source: &str, properties: SoilProperties) {
        if properties.is_empty() {
            return;
        }

        self.properties.merge(properties);
        self.sources.push(source.to_string());
        self.success = true;
        self.confidence = LIVE_CONFIDENCE;
        self.texture_class = texture::classify(&self.properties);
    }

    /// Overrides the result with the documented default.
    ///
    /// Replaces rather than merges: any previously recorded sources are
    /// dropped.
    pub(crate) fn degrade(&mut self) {
        self.texture_class = TextureClass::Loamy;
        self.confidence = FALLBACK_CONFIDENCE;
        self.sources = vec![DEFAULT_SOURCE.to_string()];
        self.success = false;
    }

    /// True when the result carries the fallback default.
    pub fn is_degraded(&self) -> bool {
        self.sources.len() == 1 && self.sources[0] == DEFAULT_SOURCE
    }
}
