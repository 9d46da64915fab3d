//! Application-wide constants.

use std::time::Duration;

// # Phase engine

/// Sampling interval while the sun is rising or setting.
pub const UPDATE_INTERVAL: Duration = Duration::from_millis(1000);

/// Smallest delay the scheduler will arm its timer with.
pub const MIN_TIMER_DELAY: Duration = Duration::from_millis(1);

/// Illuminance is computed on an integer grid of `1..=ILLUMINANCE_STEPS` ...
pub const ILLUMINANCE_STEPS: f64 = 1_000_000_000.0;

/// ... and divided by this factor, giving four decimal digits of resolution.
pub const ILLUMINANCE_DIVISOR: f64 = 10_000.0;

/// Darkest value the sensor reports (lux).
pub const MINIMUM_ILLUMINANCE: f64 = 0.0001;

/// Brightest value the sensor reports (lux).
pub const MAXIMUM_ILLUMINANCE: f64 = 100_000.0;

// # Solar events

/// Sun elevation at sunrise/sunset in degrees (refraction and solar radius included).
pub const SUNRISE_ELEVATION: f64 = -0.833;

/// Sun elevation when the bottom edge of the disc touches the horizon, in degrees.
pub const SUNRISE_END_ELEVATION: f64 = -0.3;

/// Maximum solar declination in degrees.
pub const AXIAL_TILT: f64 = 23.44;

pub const SECONDS_PER_DAY: i64 = 86_400;

// # Coordinates

pub const MINIMUM_LATITUDE: f64 = -90.0;
pub const MAXIMUM_LATITUDE: f64 = 90.0;
pub const MINIMUM_LONGITUDE: f64 = -180.0;
pub const MAXIMUM_LONGITUDE: f64 = 180.0;

// # Configuration

pub const CONFIG_DIR_NAME: &str = "daylight";
pub const CONFIG_FILE_NAME: &str = "daylight.toml";
pub const DEFAULT_NAME: &str = "Daylight";

// London, used for the generated default configuration
pub const DEFAULT_LATITUDE: f64 = 51.5074;
pub const DEFAULT_LONGITUDE: f64 = -0.1278;

// # Accessory information

pub const MANUFACTURER: &str = "Daylight";
pub const MODEL: &str = "Daylight Sensor";
pub const SERIAL_NUMBER: &str = "Daylight Sensor Serial Number";

// # Simulation

/// Simulated seconds per real second when no multiplier is given.
pub const DEFAULT_SIMULATION_MULTIPLIER: f64 = 3600.0;

// # Process

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
