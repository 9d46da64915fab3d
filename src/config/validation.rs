//! Configuration validation functionality.
//!
//! Coordinates are the only settings with constraints. They are checked once,
//! when the configuration is loaded, so nothing downstream has to handle an
//! invalid location.

use anyhow::Result;
use std::fmt;

use super::Config;
use crate::common::constants::*;

/// Error raised when the configuration cannot produce a usable sensor.
///
/// This is the only error category visible to users of the sensor: once a
/// configuration has been accepted, reads and scheduled updates cannot fail.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// A required coordinate is absent.
    MissingCoordinate(&'static str),
    /// A coordinate is NaN or infinite.
    NotFinite { field: &'static str, value: f64 },
    /// A coordinate lies outside its valid range.
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    /// The file could not be parsed (wrong types, TOML syntax).
    Malformed(String),
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCoordinate(field) => {
                write!(f, "Invalid or missing location: {field} is not configured")
            }
            Self::NotFinite { field, value } => {
                write!(f, "Invalid location: {field} must be a finite number (got {value})")
            }
            Self::OutOfRange {
                field,
                value,
                min,
                max,
            } => write!(
                f,
                "Invalid location: {field} must be between {min} and {max} degrees (got {value})"
            ),
            Self::Malformed(reason) => write!(f, "Malformed configuration: {reason}"),
        }
    }
}

impl std::error::Error for ConfigurationError {}

/// Check a single coordinate against its range.
pub(crate) fn check_coordinate(
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<f64, ConfigurationError> {
    if !value.is_finite() {
        return Err(ConfigurationError::NotFinite { field, value });
    }
    if !(min..=max).contains(&value) {
        return Err(ConfigurationError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(value)
}

/// Validate a loaded configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    config.location()?;

    if let Some(name) = &config.name
        && name.trim().is_empty()
    {
        anyhow::bail!("name must not be empty when specified");
    }

    Ok(())
}
