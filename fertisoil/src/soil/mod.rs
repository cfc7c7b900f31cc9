//! Soil enrichment.
//!
//! Turns a coordinate into a [`SoilResult`]: raw properties from a
//! [`SoilDataSource`](crate::provider::SoilDataSource), a texture class
//! derived from clay/sand/silt, and confidence/provenance describing how
//! trustworthy the result is.
//!
//! # Example
//!
//! ```ignore
//! use fertisoil::coord::Coordinate;
//! use fertisoil::provider::{ReqwestClient, SoilGridsProvider, SOILGRIDS_TIMEOUT};
//! use fertisoil::soil::SoilDataService;
//!
//! let client = ReqwestClient::with_timeout(SOILGRIDS_TIMEOUT)?;
//! let service = SoilDataService::new(SoilGridsProvider::new(client));
//!
//! let result = service.get_soil_data(Coordinate::new(12.9716, 77.5946)?);
//! println!("{} ({:.1})", result.texture_class, result.confidence);
//! ```

mod properties;
mod result;
mod service;
pub mod texture;

pub use properties::{SoilProperties, SoilProperty};
pub use result::{
    LookupLocation, SoilResult, DEFAULT_SOURCE, FALLBACK_CONFIDENCE, LIVE_CONFIDENCE,
};
pub use service::{SoilCacheConfig, SoilCacheStats, SoilDataService};
pub use texture::{classify, TextureClass, TextureComposition, TextureError};
