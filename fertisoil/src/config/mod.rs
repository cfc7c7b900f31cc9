//! Configuration file handling.
//!
//! Settings live in `~/.fertisoil/config.ini`:
//!
//! ```ini
//! [soil]
//! url = https://rest.isric.org/soilgrids/v2.0/properties/query
//! timeout = 15
//! cache_max_entries =
//! cache_ttl =
//!
//! [location]
//! url = https://api.bigdatacloud.net/data/reverse-geocode-client
//! timeout = 10
//!
//! [model]
//! classifier = classifier.json
//! encoder = fertilizer.json
//!
//! [logging]
//! level = warn
//! directory =
//! ```
//!
//! A missing file, section or key falls back to the defaults shown above.

mod file;

pub use file::{
    config_file_path, ConfigError, ConfigFile, LocationSettings, LoggingSettings, ModelSettings,
    SoilSettings, CONFIG_DIR_NAME, CONFIG_FILE_NAME,
};
