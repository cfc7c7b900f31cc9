//! Fertisoil - fertilizer recommendation and soil enrichment
//!
//! This library predicts a fertilizer label from eight agronomic features
//! and enriches geographic coordinates with soil properties and a texture
//! class fetched from SoilGrids.
//!
//! # Modules
//!
//! - [`prediction`]: feature validation, model artifacts and the fallback policy
//! - [`soil`]: soil properties, texture classification and the cached enrichment service
//! - [`location`]: reverse geocoding
//! - [`provider`]: HTTP client abstraction and remote data sources
//! - [`coord`]: coordinate validation and cache keys
//! - [`config`]: INI configuration file
//! - [`logging`]: tracing subscriber setup

pub mod config;
pub mod coord;
pub mod location;
pub mod logging;
pub mod prediction;
pub mod provider;
pub mod soil;
