//! Day/night phase classification and illuminance interpolation.
//!
//! This module is the pure half of the sensor: given an instant and the sun
//! events of today and tomorrow it decides which light phase is active, how
//! far through that phase we are, what illuminance that corresponds to, and
//! when the answer next needs to be recomputed. Nothing here reads the clock
//! or keeps state between calls.
//!
//! ## Phase windows
//!
//! Windows are half-open, so an instant equal to a boundary belongs to the
//! phase that starts there:
//!
//! | Phase     | Window                         | Ratio                          | Next update        |
//! |-----------|--------------------------------|--------------------------------|--------------------|
//! | `Rising`  | `sunrise ≤ now < sunrise_end`  | elapsed share of the window    | `now + 1s`         |
//! | `Up`      | `sunrise_end ≤ now < sunset_start` | `1`                        | `sunset_start`     |
//! | `Setting` | `sunset_start ≤ now < sunset`  | remaining share of the window  | `now + 1s`         |
//! | `Down`    | anything else                  | `0`                            | `sunrise`          |
//!
//! The steady phases sleep until their next boundary instead of polling.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::common::constants::{ILLUMINANCE_DIVISOR, ILLUMINANCE_STEPS, UPDATE_INTERVAL};
use crate::geo::SunTimes;

/// The segment of the day/night cycle that is currently active.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Between sunrise and the end of sunrise - brightening
    Rising,
    /// Full daylight
    Up,
    /// Between the start of sunset and sunset - dimming
    Setting,
    /// Night
    Down,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl Phase {
    /// Returns true while illuminance changes continuously.
    pub fn is_transitioning(&self) -> bool {
        matches!(self, Self::Rising | Self::Setting)
    }

    /// Returns true for the long stable phases (Up or Down).
    pub fn is_stable(&self) -> bool {
        !self.is_transitioning()
    }

    /// Human readable description, used when announcing phase changes.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Rising => "Sun is rising",
            Self::Up => "Sun is up",
            Self::Setting => "Sun is setting",
            Self::Down => "Sun is set",
        }
    }

}

/// Result of one evaluation of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LightReading {
    /// Illuminance in lux, between 0.0001 and 100000.
    pub illuminance: f64,
    pub phase: Phase,
    /// Normalized position in the light curve, 0 (dark) to 1 (daylight).
    pub ratio: f64,
    /// When the reading should be recomputed.
    pub next_update: DateTime<Utc>,
}

/// Map a light ratio to illuminance.
///
/// The ratio is spread over the integer grid `1..=1_000_000_000`, rounded
/// (half away from zero) and divided by 10000, giving lux values from
/// 0.0001 to 100000 with four decimal digits of resolution. Ratios
/// outside `[0, 1]` are clamped.
pub fn illuminance(ratio: f64) -> f64 {
    let ratio = if ratio.is_nan() { 0.0 } else { ratio.clamp(0.0, 1.0) };
    (1.0 + ratio * (ILLUMINANCE_STEPS - 1.0)).round() / ILLUMINANCE_DIVISOR
}

/// Fraction of `[start, end]` that lies before `now`, clamped to `[0, 1]`.
///
/// A zero-width (or inverted) window counts as already complete.
pub fn elapsed_ratio(now: DateTime<Utc>, start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    let total_ms = (end - start).num_milliseconds();
    if total_ms <= 0 {
        return 1.0;
    }

    let elapsed_ms = (now - start).num_milliseconds();
    (elapsed_ms as f64 / total_ms as f64).clamp(0.0, 1.0)
}

/// Fraction of `[start, end]` that still lies after `now`, clamped to `[0, 1]`.
///
/// A zero-width (or inverted) window has nothing remaining.
pub fn remaining_ratio(now: DateTime<Utc>, start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    let total_ms = (end - start).num_milliseconds();
    if total_ms <= 0 {
        return 0.0;
    }

    let remaining_ms = (end - now).num_milliseconds();
    (remaining_ms as f64 / total_ms as f64).clamp(0.0, 1.0)
}

fn update_interval() -> Duration {
    Duration::milliseconds(UPDATE_INTERVAL.as_millis() as i64)
}

/// Classify `now` against the sun events and compute the reading.
///
/// `today` and `tomorrow` are the sun events of the calendar date of `now`
/// and the following date. Today's events apply until today's sunset, then
/// tomorrow's (see [`SunTimes::effective`]).
pub fn evaluate(now: DateTime<Utc>, today: &SunTimes, tomorrow: &SunTimes) -> LightReading {
    let times = SunTimes::effective(now, today, tomorrow);

    let (phase, ratio, next_update) = if times.sunrise <= now && now < times.sunrise_end {
        let ratio = elapsed_ratio(now, times.sunrise, times.sunrise_end);
        (Phase::Rising, ratio, now + update_interval())
    } else if times.sunrise_end <= now && now < times.sunset_start {
        (Phase::Up, 1.0, times.sunset_start)
    } else if times.sunset_start <= now && now < times.sunset {
        let ratio = remaining_ratio(now, times.sunset_start, times.sunset);
        (Phase::Setting, ratio, now + update_interval())
    } else {
        (Phase::Down, 0.0, times.sunrise)
    };

    LightReading {
        illuminance: illuminance(ratio),
        phase,
        ratio,
        next_update,
    }
}
