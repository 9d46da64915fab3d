//! Implementation of the simulate command.
//!
//! Installs a simulated time source so the sensor loop can be watched through
//! a whole day (or several) in seconds. Control then returns to `main`, which
//! runs the loop as usual against the simulated clock.

use anyhow::{Result, anyhow, bail};
use chrono::{DateTime, Local};
use std::sync::Arc;

use crate::time_source::{self, SimulatedTimeSource};

/// Parse and validate the simulation window.
pub fn parse_window(start_time: &str, end_time: &str) -> Result<(DateTime<Local>, DateTime<Local>)> {
    let start = time_source::parse_datetime(start_time)
        .map_err(|e| anyhow!("Invalid start time: {e}"))?;
    let end =
        time_source::parse_datetime(end_time).map_err(|e| anyhow!("Invalid end time: {e}"))?;

    if end <= start {
        bail!("End time must be after start time");
    }

    Ok((start, end))
}

/// Set up the simulated time source.
///
/// # Arguments
/// * `start_time` - Start time in format "YYYY-MM-DD HH:MM:SS"
/// * `end_time` - End time in format "YYYY-MM-DD HH:MM:SS"
/// * `multiplier` - Time acceleration factor, 0 for fast-forward
/// * `debug_enabled` - Whether debug mode is enabled
pub fn handle_simulate_command(
    start_time: &str,
    end_time: &str,
    multiplier: f64,
    debug_enabled: bool,
) -> Result<()> {
    let (start, end) = parse_window(start_time, end_time)?;

    // Install before any logging so every line carries a simulated timestamp
    time_source::init_time_source(Arc::new(SimulatedTimeSource::new(start, end, multiplier)));

    log_version!();
    log_block_start!("Simulation Mode");

    let duration = end - start;
    log_decorated!(
        "Simulating from {} to {}",
        start.format("%Y-%m-%d %H:%M:%S"),
        end.format("%Y-%m-%d %H:%M:%S")
    );
    log_indented!(
        "Total simulated time: {} hours {} minutes",
        duration.num_hours(),
        duration.num_minutes() % 60
    );

    if multiplier == 0.0 {
        log_indented!("Time acceleration: fast-forward");
    } else {
        log_indented!(
            "Time acceleration: {}x (will complete in ~{:.1} seconds)",
            multiplier,
            duration.num_seconds() as f64 / multiplier
        );
    }

    if debug_enabled {
        log_pipe!();
        log_debug!("Simulated time source initialized");
    }

    Ok(())
}
