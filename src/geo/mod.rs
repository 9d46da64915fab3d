//! Geographic location and sun event calculations.
//!
//! ## Module Structure
//!
//! - [`solar`]: The [`Ephemeris`] seam and its `sunrise`-crate implementation,
//!   including extreme latitude handling
//! - [`times`]: The [`SunTimes`] quadruple the phase engine works on
//!
//! The phase engine never calculates sun positions itself. It asks an
//! [`Ephemeris`] for the sun events of a calendar day, which keeps the engine
//! a pure function and lets tests supply exact instants.

pub mod solar;
pub mod times;

pub use solar::{Ephemeris, SolarEphemeris};
pub use times::SunTimes;

use serde::Serialize;
use std::fmt;

use crate::common::constants::*;
use crate::config::ConfigurationError;
use crate::config::validation::check_coordinate;

/// A validated geographic position.
///
/// Construction is the only place coordinates are checked; every `Location`
/// in the program is finite and within range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Location {
    latitude: f64,
    longitude: f64,
}

impl Location {
    /// Create a location, rejecting non-finite or out-of-range coordinates.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ConfigurationError> {
        Ok(Self {
            latitude: check_coordinate("latitude", latitude, MINIMUM_LATITUDE, MAXIMUM_LATITUDE)?,
            longitude: check_coordinate(
                "longitude",
                longitude,
                MINIMUM_LONGITUDE,
                MAXIMUM_LONGITUDE,
            )?,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4},{:.4}", self.latitude, self.longitude)
    }
}
