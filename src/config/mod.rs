//! Configuration system for daylight.
//!
//! The sensor needs very little configuration: a display name and the
//! geographic coordinates the sun is calculated for. Settings live in a TOML
//! file searched at:
//! 1. `<dir>/daylight.toml` when a directory was given with `--config <dir>`
//! 2. `$XDG_CONFIG_HOME/daylight/daylight.toml` otherwise
//!
//! A commented default file is generated on first start:
//!
//! ```toml
//! #[Sensor]
//! name = "Daylight"    # Name reported with every reading
//!
//! #[Location]
//! latitude = 51.507400   # Geographic latitude (-90 to 90)
//! longitude = -0.127800  # Geographic longitude (-180 to 180)
//! ```
//!
//! ## Validation
//!
//! Coordinates are mandatory, must be finite and must fall within their
//! ranges. Any violation is a [`ConfigurationError`]; a sensor is never
//! constructed from an invalid configuration.

pub mod builder;
pub mod loading;
pub mod validation;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::common::constants::DEFAULT_NAME;
use crate::geo::Location;

// Re-export public API
pub use builder::create_default_config;
pub use loading::{get_config_path, get_custom_config_dir, load, load_from_path, set_config_dir};
pub use validation::{ConfigurationError, validate_config};

/// Configuration structure for daylight application settings.
///
/// Coordinates are optional at the serde level so that a missing field is
/// reported as a [`ConfigurationError`] with a helpful message instead of a
/// bare parse failure.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    /// Name of the sensor, shown in logs and JSON output.
    pub name: Option<String>,

    /// Geographic latitude in degrees (-90 to +90).
    pub latitude: Option<f64>,

    /// Geographic longitude in degrees (-180 to +180).
    pub longitude: Option<f64>,
}

impl Config {
    /// Build a configuration directly from coordinates.
    pub fn with_coordinates(latitude: f64, longitude: f64) -> Self {
        Self {
            name: None,
            latitude: Some(latitude),
            longitude: Some(longitude),
        }
    }

    /// Name of the sensor, falling back to the default.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_NAME)
    }

    /// Validated location of this configuration.
    pub fn location(&self) -> Result<Location, ConfigurationError> {
        let latitude = self
            .latitude
            .ok_or(ConfigurationError::MissingCoordinate("latitude"))?;
        let longitude = self
            .longitude
            .ok_or(ConfigurationError::MissingCoordinate("longitude"))?;

        Location::new(latitude, longitude)
    }

    /// Load configuration using automatic path detection.
    pub fn load() -> Result<Self> {
        loading::load()
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        loading::load_from_path(path)
    }

    /// Get the configuration file path.
    pub fn get_config_path() -> Result<PathBuf> {
        loading::get_config_path()
    }

    /// Log the active settings.
    pub fn log_config(&self) {
        log_block_start!("Loaded configuration");
        if let Ok(path) = Self::get_config_path() {
            log_indented!("File: {}", path.display());
        }
        log_indented!("Name: {}", self.display_name());

        if let (Some(lat), Some(lon)) = (self.latitude, self.longitude) {
            log_indented!(
                "Location: {:.4}°{}, {:.4}°{}",
                lat.abs(),
                if lat >= 0.0 { "N" } else { "S" },
                lon.abs(),
                if lon >= 0.0 { "E" } else { "W" }
            );
        }
    }
}
