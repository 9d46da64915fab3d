//! Application coordinator for the sensor loop.
//!
//! Loads the configuration, builds the sensor against the process time
//! source, installs signal handling and hands everything to [`Core`].
//!
//! ```no_run
//! use daylight::Daylight;
//!
//! # fn main() -> anyhow::Result<()> {
//! // Normal startup
//! Daylight::new(false).run()?;
//!
//! // Simulation, where the caller has already printed its own header
//! Daylight::new(true).without_headers().run()?;
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};

use crate::{
    config::{self, Config},
    core::{
        Core, CoreParams,
        phase::{LightReading, Phase},
        scheduler::{Scheduler, ValueSink},
        timer::DeadlineTimer,
    },
    io::signals::setup_signal_handler,
    sensor::DaylightSensor,
    time_source,
};

/// Builder for running the sensor loop.
pub struct Daylight {
    debug_enabled: bool,
    show_headers: bool,
}

impl Daylight {
    pub fn new(debug_enabled: bool) -> Self {
        Self {
            debug_enabled,
            show_headers: true,
        }
    }

    /// Skip the version header (simulation prints its own)
    pub fn without_headers(mut self) -> Self {
        self.show_headers = false;
        self
    }

    /// Run until a shutdown signal, or until simulated time ends.
    pub fn run(self) -> Result<()> {
        if self.show_headers {
            log_version!();
        }

        if let Some(custom_dir) = config::get_custom_config_dir() {
            log_block_start!("Base directory: {}", custom_dir.display());
        }

        let config = Config::load().context("Configuration failed")?;
        config.log_config();

        let clock = time_source::global();
        let sensor = DaylightSensor::from_config(&config, clock.clone())
            .context("Invalid sensor location")?;

        let signal_state = setup_signal_handler(self.debug_enabled)?;

        let debug_enabled = self.debug_enabled;
        let scheduler = Scheduler::new(sensor, DeadlineTimer::new(clock), self.log_sink());

        log_block_start!("Starting daylight sensor...");

        Core::new(CoreParams {
            scheduler,
            config,
            signal_state,
            debug_enabled,
        })
        .execute()
    }

    fn log_sink(&self) -> LogSink {
        LogSink::new(self.debug_enabled)
    }
}

/// Publishes every reading to the log output.
///
/// Phase changes are announced as a block with the value and, for steady
/// phases, the next wake-up. Every other value is logged in debug mode.
pub struct LogSink {
    debug_enabled: bool,
    last_phase: Option<Phase>,
    published: u64,
}

impl LogSink {
    pub fn new(debug_enabled: bool) -> Self {
        Self {
            debug_enabled,
            last_phase: None,
            published: 0,
        }
    }

    /// Number of readings received so far.
    pub fn published(&self) -> u64 {
        self.published
    }

    pub fn last_phase(&self) -> Option<Phase> {
        self.last_phase
    }
}

impl ValueSink for LogSink {
    fn on_value_change(&mut self, reading: &LightReading) {
        if self.last_phase != Some(reading.phase) {
            log_block_start!("{}", reading.phase);
            log_indented!("Illuminance: {} lux", reading.illuminance);
            if reading.phase.is_stable() {
                let local = reading.next_update.with_timezone(&chrono::Local);
                log_indented!(
                    "{}: {}",
                    next_label(reading.phase),
                    local.format("%Y-%m-%d %H:%M:%S")
                );
            }
        } else if self.debug_enabled {
            log_debug!(
                "Illuminance: {} lux ({:.2}%)",
                reading.illuminance,
                reading.ratio * 100.0
            );
        }

        self.last_phase = Some(reading.phase);
        self.published += 1;
    }
}

fn next_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Up => "Sunset starts",
        _ => "Next sunrise",
    }
}
