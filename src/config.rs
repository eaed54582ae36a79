//! Configuration management for VoluntTrac
//!
//! This module handles loading, parsing, and validation of configuration files.

use crate::constants::{CONFIG_GENERATED, DEFAULT_MAP_ZOOM, MAX_MAP_ZOOM};
use crate::entities::GeoPoint;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub firebase: FirebaseConfig,
    pub maps: MapsConfig,
    pub device: DeviceConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

/// Hosted Firebase project settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FirebaseConfig {
    /// Firebase project id
    pub project_id: String,
    /// Auth domain, informational only
    pub auth_domain: String,
    /// Environment variable holding the web API key
    pub api_key_env: String,
}

/// Map and geocoding settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapsConfig {
    /// Environment variable holding the geocoding API key
    pub api_key_env: String,
    /// Zoom level of task maps
    pub zoom: u8,
}

/// Device location used by "use my location"
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DeviceConfig {
    /// Whether the client may report a device location at all
    pub location_enabled: bool,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Radius pre-filled in the task filter, in kilometres
    pub default_radius_km: f64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// Enable logging to file
    pub enabled: bool,
}

impl Default for FirebaseConfig {
    fn default() -> Self {
        Self {
            project_id: "voluntrac".to_string(),
            auth_domain: "voluntrac.firebaseapp.com".to_string(),
            api_key_env: "VOLUNTRAC_FIREBASE_API_KEY".to_string(),
        }
    }
}

impl Default for MapsConfig {
    fn default() -> Self {
        Self {
            api_key_env: "VOLUNTRAC_MAPS_API_KEY".to_string(),
            zoom: DEFAULT_MAP_ZOOM,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { default_radius_km: 10.0 }
    }
}

impl DeviceConfig {
    /// The configured device position, if both coordinates are set
    pub fn position(&self) -> Option<GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some(GeoPoint::new(lat, lng)),
            _ => None,
        }
    }
}

impl Config {
    /// Load configuration from file or return defaults
    pub fn load() -> Result<Self> {
        let config_path = Self::find_config_file()?;

        if let Some(path) = config_path {
            Self::load_from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Find configuration file in order of precedence
    fn find_config_file() -> Result<Option<PathBuf>> {
        // 1. Check current directory
        let current_dir_config = PathBuf::from("voluntrac.toml");
        if current_dir_config.exists() {
            return Ok(Some(current_dir_config));
        }

        // 2. Check XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("voluntrac").join("config.toml");
            if xdg_config.exists() {
                return Ok(Some(xdg_config));
            }
        }

        Ok(None)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.firebase.project_id.trim().is_empty() {
            anyhow::bail!("firebase.project_id cannot be empty");
        }
        if self.firebase.api_key_env.trim().is_empty() {
            anyhow::bail!("firebase.api_key_env cannot be empty");
        }

        if self.maps.zoom == 0 || self.maps.zoom > MAX_MAP_ZOOM {
            anyhow::bail!("maps.zoom must be between 1 and {}, got {}", MAX_MAP_ZOOM, self.maps.zoom);
        }

        if !(self.ui.default_radius_km.is_finite() && self.ui.default_radius_km > 0.0) {
            anyhow::bail!("ui.default_radius_km must be a positive number");
        }

        match (self.device.latitude, self.device.longitude) {
            (Some(_), Some(_)) => {
                if let Some(point) = self.device.position() {
                    if !point.is_valid() {
                        anyhow::bail!("device position {} is out of range", point);
                    }
                }
            }
            (None, None) => {}
            _ => anyhow::bail!("device.latitude and device.longitude must be set together"),
        }

        Ok(())
    }

    /// Read the Firebase API key from the configured environment variable
    pub fn firebase_api_key(&self) -> Result<String> {
        std::env::var(&self.firebase.api_key_env)
            .with_context(|| format!("{} environment variable not set", self.firebase.api_key_env))
    }

    /// Read the maps API key, if present
    pub fn maps_api_key(&self) -> Option<String> {
        std::env::var(&self.maps.api_key_env).ok().filter(|k| !k.is_empty())
    }

    /// Generate default configuration file
    pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
        let config = Self::default();
        let toml_content = toml::to_string_pretty(&config).context("Failed to serialize default config")?;

        // Add header comment
        let header = format!(
            "# VoluntTrac Configuration File\n# Generated on {}\n\n",
            chrono::Local::now().format("%Y-%m-%d")
        );

        let full_content = header + &toml_content;

        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        std::fs::write(&path, full_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        println!("{}: {}", CONFIG_GENERATED, path.as_ref().display());
        Ok(())
    }

    /// Get the XDG config directory path
    pub fn get_xdg_config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
            .map(|dir| dir.join("voluntrac"))
    }

    /// Get the default config file path
    pub fn get_default_config_path() -> Result<PathBuf> {
        Ok(Self::get_xdg_config_dir()?.join("config.toml"))
    }
}
