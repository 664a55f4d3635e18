use serde::{Deserialize, Serialize};

use super::platform;
use crate::geo::{GeoPoint, DEFAULT_CENTER};
use crate::viewport::DEFAULT_ZOOM;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub directory: DirectoryConfig,
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub player: PlayerConfig,
}

/// Station directory source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Equivalent API mirrors; one is picked at random per fetch for load
    /// distribution. A failed fetch is not retried on another mirror.
    #[serde(default = "default_mirrors")]
    pub mirrors: Vec<String>,
    /// Station count requested per fetch.
    #[serde(default = "default_fetch_limit")]
    pub fetch_limit: u32,
}

/// Initial map view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    #[serde(default = "default_center")]
    pub default_center: GeoPoint,
    #[serde(default = "default_zoom")]
    pub default_zoom: f64,
}

/// HTTP API for the map front-end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_http_enabled")]
    pub enabled: bool,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Audio transport (mpv) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    #[serde(default = "default_volume")]
    pub default_volume: f32,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            mirrors: default_mirrors(),
            fetch_limit: default_fetch_limit(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            default_center: default_center(),
            default_zoom: default_zoom(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            enabled: default_http_enabled(),
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            default_volume: default_volume(),
        }
    }
}

fn default_mirrors() -> Vec<String> {
    ["de1", "fr1", "nl1"]
        .iter()
        .map(|mirror| format!("https://{}.api.radio-browser.info/json", mirror))
        .collect()
}

fn default_fetch_limit() -> u32 {
    1000
}

fn default_center() -> GeoPoint {
    DEFAULT_CENTER
}

fn default_zoom() -> f64 {
    DEFAULT_ZOOM
}

fn default_http_enabled() -> bool {
    true
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8787
}

fn default_volume() -> f32 {
    0.5
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}
