//! Application configuration.
//!
//! Native builds read an optional TOML file (`atlas.toml` in the working
//! directory, or the path in `DETONATION_ATLAS_CONFIG`). Web builds take
//! overrides from the page URL query string.

use crate::map::ClusterConfig;
use crate::state::url_state::UrlParams;
use serde::Deserialize;
use thiserror::Error;

/// Rows per table page. Large enough that the whole dataset fits on one page.
pub const DEFAULT_PAGE_SIZE: usize = 10_000;

/// Initial map zoom (whole world visible).
pub const DEFAULT_ZOOM: f32 = 2.0;

#[cfg(not(target_arch = "wasm32"))]
const CONFIG_ENV_VAR: &str = "DETONATION_ATLAS_CONFIG";
#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_CONFIG_PATH: &str = "atlas.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Which basemap is drawn beneath the markers.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BasemapKind {
    /// Latitude/longitude grid only
    #[default]
    Graticule,
    /// Grid plus vector outlines loaded from GeoJSON
    Vector,
}

impl BasemapKind {
    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "graticule" => Some(Self::Graticule),
            "vector" => Some(Self::Vector),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Location of the detonation JSON document
    pub data_url: String,
    /// Rows per table page
    pub page_size: usize,
    /// Zoom level on startup and after a view reset
    pub initial_zoom: f32,
    /// Marker clustering parameters
    pub cluster: ClusterConfig,
    pub basemap: BasemapKind,
    /// GeoJSON outlines for the vector basemap
    pub basemap_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_url: default_data_url().to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            initial_zoom: DEFAULT_ZOOM,
            cluster: ClusterConfig::default(),
            basemap: BasemapKind::default(),
            basemap_url: "/world.geojson".to_string(),
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn default_data_url() -> &'static str {
    "/detonation-data.json"
}

#[cfg(not(target_arch = "wasm32"))]
fn default_data_url() -> &'static str {
    "detonation-data.json"
}

impl AppConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Loads the configuration for this platform, falling back to defaults.
    pub fn load() -> Self {
        let mut config = match Self::load_platform() {
            Ok(config) => config,
            Err(e) => {
                log::error!("Using default configuration: {}", e);
                Self::default()
            }
        };
        config.apply_url_params(&crate::state::url_state::parse_from_url());
        config.page_size = config.page_size.max(1);
        config
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn load_platform() -> Result<Self, ConfigError> {
        let explicit = std::env::var(CONFIG_ENV_VAR).ok();
        let path = explicit.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);

        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if explicit.is_none() && e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No {} found, using defaults", path);
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(ConfigError::Io {
                    path: path.to_string(),
                    message: e.to_string(),
                })
            }
        };

        log::info!("Loaded configuration from {}", path);
        Self::from_toml_str(&contents)
    }

    #[cfg(target_arch = "wasm32")]
    fn load_platform() -> Result<Self, ConfigError> {
        Ok(Self::default())
    }

    /// Applies query-string overrides on top of the loaded values.
    pub fn apply_url_params(&mut self, params: &UrlParams) {
        if let Some(ref data) = params.data {
            self.data_url = data.clone();
        }
        if let Some(page_size) = params.page_size {
            self.page_size = page_size;
        }
        if let Some(zoom) = params.zoom {
            self.initial_zoom = zoom;
        }
        if let Some(radius) = params.radius {
            self.cluster.radius_px = radius;
        }
        if let Some(max_zoom) = params.max_zoom {
            self.cluster.max_zoom = max_zoom;
        }
        if let Some(min_points) = params.min_points {
            self.cluster.min_points = min_points;
        }
        if let Some(enabled) = params.cluster {
            self.cluster.enabled = enabled;
        }
        if let Some(kind) = params.basemap.as_deref().and_then(BasemapKind::parse) {
            self.basemap = kind;
        }
        if let Some(ref url) = params.basemap_url {
            self.basemap_url = url.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::url_state::parse_query;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.initial_zoom, 2.0);
        assert_eq!(config.cluster.radius_px, 60.0);
        assert_eq!(config.cluster.max_zoom, 15);
        assert_eq!(config.basemap, BasemapKind::Graticule);
    }

    #[test]
    fn test_partial_toml() {
        let config = AppConfig::from_toml_str(
            r#"
            page_size = 10
            basemap = "vector"

            [cluster]
            radius_px = 80.0
            "#,
        )
        .unwrap();

        assert_eq!(config.page_size, 10);
        assert_eq!(config.basemap, BasemapKind::Vector);
        assert_eq!(config.cluster.radius_px, 80.0);
        assert_eq!(config.cluster.max_zoom, 15);
        assert_eq!(config.data_url, AppConfig::default().data_url);
    }

    #[test]
    fn test_invalid_toml() {
        let err = AppConfig::from_toml_str("page_size = \"ten\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_url_overrides() {
        let mut config = AppConfig::default();
        config.apply_url_params(&parse_query(
            "?page_size=25&cluster=off&radius=40&basemap=vector&data=/other.json",
        ));

        assert_eq!(config.page_size, 25);
        assert!(!config.cluster.enabled);
        assert_eq!(config.cluster.radius_px, 40.0);
        assert_eq!(config.basemap, BasemapKind::Vector);
        assert_eq!(config.data_url, "/other.json");
    }
}
