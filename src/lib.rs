//! # Daylight Library
//!
//! A simulated ambient light sensor driven by the position of the sun.
//!
//! The library holds everything the `daylight` binary runs so the internals can
//! be tested directly.
//!
//! ## Architecture
//!
//! - **Entry Point**: [`Daylight`] loads configuration and runs the sensor loop
//! - **Core Logic**: `core` holds the pure phase engine, the timer abstraction,
//!   the self-rescheduling scheduler and the runtime loop
//! - **Sensor**: [`DaylightSensor`] answers on-demand reads
//! - **Geographic**: `geo` computes sunrise/sunset instants per location and date
//! - **Configuration**: `config` for the TOML settings file
//! - **Commands**: `commands` for the one-shot `get` and `simulate` commands
//! - **Infrastructure**: signal handling, logging and the time source

// Import macros from logger module for use in all submodules
#[macro_use]
pub mod logger;

pub mod args;
pub mod commands;
pub mod common;
pub mod config;
pub mod core;
pub mod geo;
pub mod io;
pub mod sensor;
pub mod time_source;

#[cfg(any(test, feature = "testing-support"))]
pub mod testing;

mod daylight;

pub use crate::core::phase::{LightReading, Phase};
pub use daylight::{Daylight, LogSink};
pub use sensor::{AccessoryInfo, DaylightSensor};
