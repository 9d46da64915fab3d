//! The daylight sensor: on-demand reads of the simulated ambient light.
//!
//! [`DaylightSensor`] ties a validated [`Location`] to an [`Ephemeris`] and a
//! [`TimeSource`]. Every read evaluates the phase engine afresh; the sensor
//! holds no mutable state, so clones can be read from any thread while the
//! scheduler runs.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::common::constants::{MANUFACTURER, MODEL, SERIAL_NUMBER};
use crate::config::{Config, ConfigurationError};
use crate::core::phase::{self, LightReading};
use crate::geo::{Ephemeris, Location, SolarEphemeris, SunTimes};
use crate::time_source::TimeSource;

/// Static accessory information reported alongside readings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccessoryInfo {
    pub name: String,
    pub manufacturer: &'static str,
    pub model: &'static str,
    pub serial_number: &'static str,
}

/// Simulated ambient light sensor for one location.
#[derive(Clone)]
pub struct DaylightSensor {
    name: String,
    location: Location,
    ephemeris: Arc<dyn Ephemeris>,
    clock: Arc<dyn TimeSource>,
}

impl DaylightSensor {
    pub fn new(
        name: impl Into<String>,
        location: Location,
        ephemeris: Arc<dyn Ephemeris>,
        clock: Arc<dyn TimeSource>,
    ) -> Self {
        Self {
            name: name.into(),
            location,
            ephemeris,
            clock,
        }
    }

    /// Build a sensor from configuration using the astronomical ephemeris.
    ///
    /// Fails only when the configured location is invalid.
    pub fn from_config(
        config: &Config,
        clock: Arc<dyn TimeSource>,
    ) -> Result<Self, ConfigurationError> {
        Ok(Self::new(
            config.display_name(),
            config.location()?,
            Arc::new(SolarEphemeris),
            clock,
        ))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn clock(&self) -> &Arc<dyn TimeSource> {
        &self.clock
    }

    /// Sun events of the day containing `now` and of the following day.
    pub fn sun_times(&self, now: DateTime<Utc>) -> (SunTimes, SunTimes) {
        let today = solar_date(now, &self.location);
        let tomorrow = today.succ_opt().unwrap_or(today);

        (
            self.ephemeris.sun_times(today, &self.location),
            self.ephemeris.sun_times(tomorrow, &self.location),
        )
    }

    /// Evaluate the sensor at a given instant.
    pub fn reading_at(&self, now: DateTime<Utc>) -> LightReading {
        let (today, tomorrow) = self.sun_times(now);
        phase::evaluate(now, &today, &tomorrow)
    }

    /// Evaluate the sensor at the current instant of its clock.
    pub fn current_reading(&self) -> LightReading {
        self.reading_at(self.now())
    }

    /// Current illuminance in lux.
    ///
    /// This is the synchronous "get" path for point-in-time queries. It never
    /// touches the scheduler and cannot fail.
    pub fn read_value(&self) -> f64 {
        self.current_reading().illuminance
    }

    /// Whether the sensor is operational. A constructed sensor always is.
    pub fn status_active(&self) -> bool {
        true
    }

    pub fn info(&self) -> AccessoryInfo {
        AccessoryInfo {
            name: self.name.clone(),
            manufacturer: MANUFACTURER,
            model: MODEL,
            serial_number: SERIAL_NUMBER,
        }
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        self.clock.now().with_timezone(&Utc)
    }
}

/// Calendar date of `now` in the location's mean solar time.
///
/// Using the location rather than the machine's timezone keeps "today" aligned
/// with the solar day the ephemeris computes, wherever the host runs.
pub fn solar_date(now: DateTime<Utc>, location: &Location) -> NaiveDate {
    let offset = Duration::seconds((location.longitude() * 240.0).round() as i64);
    (now + offset).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::phase::Phase;
    use crate::testing::{FixedEphemeris, ManualClock};
    use chrono::TimeZone;

    fn utc(d: u32, h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, d, h, m, 0).unwrap()
    }

    fn sensor(now: DateTime<Utc>) -> (DaylightSensor, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(now));
        let sensor = DaylightSensor::new(
            "Garden",
            Location::new(51.5, -0.12).unwrap(),
            Arc::new(FixedEphemeris::london()),
            clock.clone(),
        );
        (sensor, clock)
    }

    #[test]
    fn test_read_value_follows_the_clock() {
        let (sensor, clock) = sensor(utc(20, 3, 0));
        assert_eq!(sensor.read_value(), 0.0001);

        clock.set(utc(20, 6, 15));
        assert_eq!(sensor.read_value(), 50000.0001);

        clock.set(utc(20, 12, 0));
        assert_eq!(sensor.read_value(), 100000.0);
    }

    #[test]
    fn test_reads_are_idempotent_for_frozen_time() {
        let (sensor, _clock) = sensor(utc(20, 19, 47));
        let first = sensor.current_reading();
        let second = sensor.current_reading();

        assert_eq!(first, second);
        assert_eq!(first.phase, Phase::Setting);
    }

    #[test]
    fn test_night_reading_waits_for_next_sunrise() {
        let (sensor, _clock) = sensor(utc(20, 23, 0));
        let reading = sensor.current_reading();

        assert_eq!(reading.phase, Phase::Down);
        assert_eq!(reading.next_update, utc(21, 6, 0));
    }

    #[test]
    fn test_status_and_info() {
        let (sensor, _clock) = sensor(utc(20, 12, 0));

        assert!(sensor.status_active());
        let info = sensor.info();
        assert_eq!(info.name, "Garden");
        assert_eq!(info.model, "Daylight Sensor");
    }

    #[test]
    fn test_from_config_rejects_invalid_location() {
        let clock: Arc<dyn TimeSource> = Arc::new(ManualClock::new(utc(20, 12, 0)));

        assert!(DaylightSensor::from_config(&Config::with_coordinates(95.0, 0.0), clock.clone()).is_err());
        assert!(DaylightSensor::from_config(&Config::default(), clock.clone()).is_err());

        let sensor = DaylightSensor::from_config(&Config::with_coordinates(51.5, -0.12), clock).unwrap();
        assert_eq!(sensor.name(), "Daylight");
    }

    #[test]
    fn test_solar_date_uses_location_longitude() {
        let tokyo = Location::new(35.68, 139.69).unwrap();
        let honolulu = Location::new(21.31, -157.86).unwrap();
        let now = utc(20, 20, 0);

        assert_eq!(solar_date(now, &tokyo), utc(21, 0, 0).date_naive());
        assert_eq!(solar_date(now, &honolulu), utc(20, 0, 0).date_naive());
        assert_eq!(solar_date(utc(21, 2, 0), &honolulu), utc(20, 0, 0).date_naive());
    }
}
