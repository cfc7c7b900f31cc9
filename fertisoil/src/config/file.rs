//! INI configuration file.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use ini::Ini;
use thiserror::Error;

use crate::prediction::{DEFAULT_CLASSIFIER_FILE, DEFAULT_ENCODER_FILE};
use crate::provider::{
    BIGDATACLOUD_BASE_URL, BIGDATACLOUD_TIMEOUT, SOILGRIDS_BASE_URL, SOILGRIDS_TIMEOUT,
};
use crate::soil::SoilCacheConfig;

/// Configuration directory name under the user's home directory.
pub const CONFIG_DIR_NAME: &str = ".fertisoil";

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.ini";

/// Errors raised while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The home directory could not be determined.
    #[error("Could not determine home directory")]
    NoHomeDir,

    /// The file exists but could not be read or parsed.
    #[error("Failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: ini::Error },

    /// The file could not be written.
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The key is not one of the known `section.key` names.
    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),

    /// A key holds a value of the wrong shape.
    #[error("Invalid value for {section}.{key}: '{value}' ({reason})")]
    InvalidValue {
        section: &'static str,
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// `[soil]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct SoilSettings {
    pub url: String,
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Maximum cached coordinates; unbounded when unset.
    pub cache_max_entries: Option<u64>,
    /// Cache entry lifetime in seconds; unlimited when unset.
    pub cache_ttl: Option<u64>,
}

impl Default for SoilSettings {
    fn default() -> Self {
        Self {
            url: SOILGRIDS_BASE_URL.to_string(),
            timeout: SOILGRIDS_TIMEOUT.as_secs(),
            cache_max_entries: None,
            cache_ttl: None,
        }
    }
}

/// `[location]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationSettings {
    pub url: String,
    /// Request timeout in seconds.
    pub timeout: u64,
}

impl Default for LocationSettings {
    fn default() -> Self {
        Self {
            url: BIGDATACLOUD_BASE_URL.to_string(),
            timeout: BIGDATACLOUD_TIMEOUT.as_secs(),
        }
    }
}

/// `[model]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSettings {
    pub classifier: PathBuf,
    pub encoder: PathBuf,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            classifier: PathBuf::from(DEFAULT_CLASSIFIER_FILE),
            encoder: PathBuf::from(DEFAULT_ENCODER_FILE),
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Default filter directive, e.g. `info` or `fertisoil=debug`.
    pub level: String,
    /// Directory for daily log files; stderr only when unset.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            directory: None,
        }
    }
}

/// The whole configuration file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub soil: SoilSettings,
    pub location: LocationSettings,
    pub model: ModelSettings,
    pub logging: LoggingSettings,
}

/// Returns `~/.fertisoil/config.ini`.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
        .ok_or(ConfigError::NoHomeDir)
}

impl ConfigFile {
    /// Loads the default configuration file, or defaults if it is absent.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path()?)
    }

    /// Loads a configuration file, or defaults if it is absent.
    ///
    /// Keys missing from the file keep their default values.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::from_ini(&ini)
    }

    /// Parses an already loaded INI document.
    pub fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(section) = ini.section(Some("soil")) {
            if let Some(v) = section.get("url") {
                config.soil.url = v.to_string();
            }
            if let Some(v) = section.get("timeout") {
                config.soil.timeout = parse_secs("soil", "timeout", v)?;
            }
            if let Some(v) = section.get("cache_max_entries") {
                config.soil.cache_max_entries = parse_optional("soil", "cache_max_entries", v)?;
            }
            if let Some(v) = section.get("cache_ttl") {
                config.soil.cache_ttl = parse_optional("soil", "cache_ttl", v)?;
            }
        }

        if let Some(section) = ini.section(Some("location")) {
            if let Some(v) = section.get("url") {
                config.location.url = v.to_string();
            }
            if let Some(v) = section.get("timeout") {
                config.location.timeout = parse_secs("location", "timeout", v)?;
            }
        }

        if let Some(section) = ini.section(Some("model")) {
            if let Some(v) = section.get("classifier") {
                config.model.classifier = PathBuf::from(v);
            }
            if let Some(v) = section.get("encoder") {
                config.model.encoder = PathBuf::from(v);
            }
        }

        if let Some(section) = ini.section(Some("logging")) {
            if let Some(v) = section.get("level") {
                config.logging.level = v.to_string();
            }
            if let Some(v) = section.get("directory") {
                config.logging.directory = (!v.trim().is_empty()).then(|| PathBuf::from(v));
            }
        }

        Ok(config)
    }

    /// Renders the configuration as an INI document.
    pub fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();
        ini.with_section(Some("soil"))
            .set("url", self.soil.url.as_str())
            .set("timeout", self.soil.timeout.to_string())
            .set("cache_max_entries", optional(self.soil.cache_max_entries))
            .set("cache_ttl", optional(self.soil.cache_ttl));
        ini.with_section(Some("location"))
            .set("url", self.location.url.as_str())
            .set("timeout", self.location.timeout.to_string());
        ini.with_section(Some("model"))
            .set("classifier", self.model.classifier.to_string_lossy())
            .set("encoder", self.model.encoder.to_string_lossy());
        ini.with_section(Some("logging"))
            .set("level", self.logging.level.as_str())
            .set(
                "directory",
                self.logging
                    .directory
                    .as_ref()
                    .map(|d| d.to_string_lossy().to_string())
                    .unwrap_or_default(),
            );
        ini
    }

    /// Writes the configuration to the default file.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path()?)
    }

    /// Writes the configuration, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        self.to_ini().write_to_file(path).map_err(write_err)
    }

    /// Cache eviction policy for the soil service.
    pub fn soil_cache_config(&self) -> SoilCacheConfig {
        SoilCacheConfig {
            max_entries: self.soil.cache_max_entries,
            time_to_live: self.soil.cache_ttl.map(Duration::from_secs),
        }
    }

    pub fn soil_timeout(&self) -> Duration {
        Duration::from_secs(self.soil.timeout)
    }

    pub fn location_timeout(&self) -> Duration {
        Duration::from_secs(self.location.timeout)
    }

    /// Returns the value stored under `section.key`, as written to the file.
    pub fn get(&self, name: &str) -> Result<String, ConfigError> {
        let (section, key) = split_key(name)?;
        self.to_ini()
            .get_from(Some(section), key)
            .map(str::to_string)
            .ok_or_else(|| ConfigError::UnknownKey(name.to_string()))
    }

    /// Sets `section.key`, validating the value like a loaded file would.
    ///
    /// On error the configuration is left unchanged.
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        let (section, key) = split_key(name)?;
        let mut ini = self.to_ini();
        if ini.get_from(Some(section), key).is_none() {
            return Err(ConfigError::UnknownKey(name.to_string()));
        }
        ini.with_section(Some(section)).set(key, value);
        *self = Self::from_ini(&ini)?;
        Ok(())
    }

    /// Flattened `(section, key, value)` triples for display.
    pub fn entries(&self) -> Vec<(String, String, String)> {
        let ini = self.to_ini();
        let mut entries = Vec::new();
        for (section, props) in ini.iter() {
            let section = section.unwrap_or_default();
            for (key, value) in props.iter() {
                entries.push((section.to_string(), key.to_string(), value.to_string()));
            }
        }
        entries
    }
}

fn split_key(name: &str) -> Result<(&str, &str), ConfigError> {
    name.split_once('.')
        .filter(|(section, key)| !section.is_empty() && !key.is_empty())
        .ok_or_else(|| ConfigError::UnknownKey(name.to_string()))
}

fn optional(value: Option<u64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn parse_secs(section: &'static str, key: &'static str, value: &str) -> Result<u64, ConfigError> {
    let secs: u64 = parse(section, key, value)?;
    if secs == 0 {
        return Err(ConfigError::InvalidValue {
            section,
            key,
            value: value.to_string(),
            reason: "must be at least 1 second".to_string(),
        });
    }
    Ok(secs)
}

fn parse_optional(
    section: &'static str,
    key: &'static str,
    value: &str,
) -> Result<Option<u64>, ConfigError> {
    if value.trim().is_empty() {
        Ok(None)
    } else {
        parse(section, key, value).map(Some)
    }
}

fn parse<T>(section: &'static str, key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidValue {
            section,
            key,
            value: value.to_string(),
            reason: e.to_string(),
        })
}
