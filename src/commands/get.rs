//! Get command implementation: print the current light level and exit.
//!
//! Output is either the usual decorated log block or a single JSON object for
//! scripts.

use anyhow::{Context, Result};
use serde_json::{Value, json};

use crate::{
    config::Config, core::phase::LightReading, logger::Log, sensor::DaylightSensor,
    time_source,
};

/// Handle the get command
pub fn handle_get_command(json: bool) -> Result<()> {
    // Keep stdout parseable
    if json {
        Log::set_enabled(false);
    }

    let config = Config::load().context("Configuration failed")?;
    let sensor = DaylightSensor::from_config(&config, time_source::global())
        .context("Invalid sensor location")?;
    let reading = sensor.current_reading();

    if json {
        println!("{}", serde_json::to_string_pretty(&reading_json(&sensor, &reading))?);
        return Ok(());
    }

    let next_update = reading.next_update.with_timezone(&chrono::Local);

    log_version!();
    log_block_start!("{}: {}", sensor.name(), reading.phase);
    log_indented!("Illuminance: {} lux", reading.illuminance);
    log_indented!("Location: {}", sensor.location());
    log_indented!("Next update: {}", next_update.format("%Y-%m-%d %H:%M:%S"));
    log_end!();

    Ok(())
}

/// JSON document describing a reading.
pub fn reading_json(sensor: &DaylightSensor, reading: &LightReading) -> Value {
    let location = sensor.location();
    json!({
        "name": sensor.name(),
        "illuminance": reading.illuminance,
        "phase": reading.phase,
        "ratio": reading.ratio,
        "next_update": reading.next_update.to_rfc3339(),
        "status_active": sensor.status_active(),
        "location": {
            "latitude": location.latitude(),
            "longitude": location.longitude(),
        },
        "info": sensor.info(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Location;
    use crate::testing::{FixedEphemeris, ManualClock};
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    #[test]
    fn test_reading_json_fields() {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2026, 3, 20, 12, 0, 0).unwrap(),
        ));
        let sensor = DaylightSensor::new(
            "Porch",
            Location::new(51.5, -0.12).unwrap(),
            Arc::new(FixedEphemeris::london()),
            clock,
        );
        let value = reading_json(&sensor, &sensor.current_reading());

        assert_eq!(value["name"], "Porch");
        assert_eq!(value["illuminance"], 100000.0);
        assert_eq!(value["phase"], "up");
        assert_eq!(value["next_update"], "2026-03-20T19:30:00+00:00");
        assert_eq!(value["status_active"], true);
        assert_eq!(value["location"]["latitude"], 51.5);
        assert_eq!(value["info"]["serial_number"], "Daylight Sensor Serial Number");
    }
}
