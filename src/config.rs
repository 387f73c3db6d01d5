use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::constants::*;
use crate::error::{BrowserError, Result};
use crate::types::LatLng;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub foursquare: FoursquareConfig,
    pub map: MapConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FoursquareConfig {
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub version: String,
    pub photo_size: String,
}

impl Default for FoursquareConfig {
    fn default() -> Self {
        Self {
            base_url: FOURSQUARE_BASE_URL.to_string(),
            client_id: String::new(),
            client_secret: String::new(),
            version: FOURSQUARE_API_VERSION.to_string(),
            photo_size: DEFAULT_PHOTO_SIZE.to_string(),
        }
    }
}

impl FoursquareConfig {
    pub fn has_credentials(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub center_lat: f64,
    pub center_lng: f64,
    pub zoom: u8,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center_lat: DEFAULT_CENTER_LAT,
            center_lng: DEFAULT_CENTER_LNG,
            zoom: DEFAULT_ZOOM,
        }
    }
}

impl MapConfig {
    pub fn center(&self) -> LatLng {
        LatLng::new(self.center_lat, self.center_lng)
    }
}

impl Config {
    /// Load configuration from `path`, falling back to defaults when the file
    /// does not exist, then apply credential overrides from the environment.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                BrowserError::Config(format!(
                    "Failed to read config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
            let config: Config = toml::from_str(&content)?;
            info!(path = %path.display(), "Loaded configuration");
            config
        } else {
            debug!(path = %path.display(), "No config file, using defaults");
            Config::default()
        };

        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(id) = std::env::var(ENV_CLIENT_ID) {
            self.foursquare.client_id = id;
        }
        if let Ok(secret) = std::env::var(ENV_CLIENT_SECRET) {
            self.foursquare.client_secret = secret;
        }
    }

    fn validate(&self) -> Result<()> {
        if self.foursquare.base_url.trim().is_empty() {
            return Err(BrowserError::Config("foursquare.base_url must not be empty".into()));
        }
        let lat_ok = (-90.0..=90.0).contains(&self.map.center_lat);
        let lng_ok = (-180.0..=180.0).contains(&self.map.center_lng);
        if !lat_ok || !lng_ok {
            return Err(BrowserError::Config(format!(
                "map center ({}, {}) is not a valid coordinate",
                self.map.center_lat, self.map.center_lng
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = Config::load("definitely/not/here.toml").unwrap();
        assert_eq!(config.foursquare.base_url, FOURSQUARE_BASE_URL);
        assert_eq!(config.foursquare.version, "20150828");
        assert_eq!(config.foursquare.photo_size, "width400");
        assert_eq!(config.map.zoom, 11);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[map]\nzoom = 14\n\n[foursquare]\nphoto_size = \"300x300\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.map.zoom, 14);
        assert_eq!(config.map.center_lat, DEFAULT_CENTER_LAT);
        assert_eq!(config.foursquare.photo_size, "300x300");
        assert_eq!(config.foursquare.version, FOURSQUARE_API_VERSION);
    }

    #[test]
    fn test_invalid_center_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[map]\ncenter_lat = 123.0").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, BrowserError::Config(_)));
    }

    #[test]
    fn test_malformed_toml_is_toml_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[map\nzoom = ").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, BrowserError::Toml(_)));
    }
}
