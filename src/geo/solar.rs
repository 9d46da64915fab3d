//! Astronomical sun event calculation.
//!
//! [`SolarEphemeris`] delegates the actual astronomy to the `sunrise` crate and
//! adds extreme latitude handling on top: near the poles the sun may never
//! reach (or never leave) the elevation that defines an event, in which case
//! the crate has no meaningful answer. Those events are replaced with
//! instants derived from solar noon so the resulting [`SunTimes`] stays
//! ordered and consecutive days join without gaps.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use std::f64::consts::PI;
use sunrise::{Coordinates, SolarDay, SolarEvent};

use super::{Location, SunTimes};
use crate::common::constants::*;

/// Source of sun event instants for a calendar day.
///
/// Implementations must be deterministic: the same date and location always
/// yield the same instants.
pub trait Ephemeris: Send + Sync {
    fn sun_times(&self, date: NaiveDate, location: &Location) -> SunTimes;
}

/// Ephemeris backed by the `sunrise` crate.
///
/// `sunrise`/`sunset` use the standard −0.833° elevation; `sunrise_end` and
/// `sunset_start` use −0.3°, when the bottom edge of the disc is at the
/// horizon.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolarEphemeris;

impl Ephemeris for SolarEphemeris {
    fn sun_times(&self, date: NaiveDate, location: &Location) -> SunTimes {
        let noon = approximate_solar_noon(date, location.longitude());

        // Continuous daylight: keep the sensor up across the whole day and overlap
        // neighbouring days so no instant falls between two quadruples
        if crossing(location.latitude(), date, SUNRISE_END_ELEVATION) == Crossing::NeverLeft {
            let day = Duration::hours(24);
            return SunTimes::new(noon - day, noon - day, noon + day, noon + day);
        }

        let solar_day = Coordinates::new(location.latitude(), location.longitude())
            .map(|coord| SolarDay::new(coord, date));
        let event = |kind: SolarEvent, elevation: f64, morning: bool| {
            let computed = match crossing(location.latitude(), date, elevation) {
                Crossing::Occurs => solar_day.as_ref().map(|day| day.event_time(kind)),
                _ => None,
            };

            computed
                .filter(|time| (*time - noon).num_seconds().abs() <= SECONDS_PER_DAY)
                .unwrap_or_else(|| fallback_event(location.latitude(), date, elevation, noon, morning))
        };

        let edge = |morning: bool| SolarEvent::Elevation {
            elevation: SUNRISE_END_ELEVATION.to_radians(),
            morning,
        };

        SunTimes::new(
            event(SolarEvent::Sunrise, SUNRISE_ELEVATION, true),
            event(edge(true), SUNRISE_END_ELEVATION, true),
            event(edge(false), SUNRISE_END_ELEVATION, false),
            event(SolarEvent::Sunset, SUNRISE_ELEVATION, false),
        )
        .into_ordered()
    }
}

/// Whether the sun crosses a given elevation on a date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Crossing {
    /// The sun rises above and sets below the elevation.
    Occurs,
    /// The sun stays below the elevation all day.
    NeverReached,
    /// The sun stays above the elevation all day.
    NeverLeft,
}

/// Classify an elevation crossing using the sunrise equation.
pub(crate) fn crossing(latitude: f64, date: NaiveDate, elevation: f64) -> Crossing {
    let cos_hour_angle = cos_hour_angle(latitude, date, elevation);

    if cos_hour_angle > 1.0 {
        Crossing::NeverReached
    } else if cos_hour_angle < -1.0 {
        Crossing::NeverLeft
    } else {
        Crossing::Occurs
    }
}

fn cos_hour_angle(latitude: f64, date: NaiveDate, elevation: f64) -> f64 {
    let lat = latitude.to_radians();
    let dec = solar_declination(date).to_radians();
    let h = elevation.to_radians();

    (h.sin() - lat.sin() * dec.sin()) / (lat.cos() * dec.cos())
}

/// Approximate solar declination in degrees.
pub(crate) fn solar_declination(date: NaiveDate) -> f64 {
    let day = date.ordinal0() as f64;
    -AXIAL_TILT * (2.0 * PI / 365.0 * (day + 10.0)).cos()
}

/// Solar noon without the equation of time (accurate to about 16 minutes).
pub(crate) fn approximate_solar_noon(date: NaiveDate, longitude: f64) -> DateTime<Utc> {
    let midnight = Utc.from_utc_datetime(&date.and_time(NaiveTime::default()));
    midnight + Duration::hours(12) - Duration::seconds((longitude * 240.0).round() as i64)
}

/// Substitute for an event the sun never produces on this date.
fn fallback_event(
    latitude: f64,
    date: NaiveDate,
    elevation: f64,
    noon: DateTime<Utc>,
    morning: bool,
) -> DateTime<Utc> {
    // Sun never gets this high: the event collapses onto the daily peak.
    // Sun never gets this low: the event moves to the surrounding solar midnight.
    if cos_hour_angle(latitude, date, elevation) > 0.0 {
        noon
    } else if morning {
        noon - Duration::hours(12)
    } else {
        noon + Duration::hours(12)
    }
}
