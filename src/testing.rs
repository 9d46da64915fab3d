//! Deterministic collaborators for tests.
//!
//! Available to unit tests and, through the `testing-support` feature, to the
//! integration tests under `tests/`.

use chrono::{DateTime, Duration as ChronoDuration, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;

use crate::core::phase::LightReading;
use crate::core::scheduler::ValueSink;
use crate::core::timer::Timer;
use crate::geo::{Ephemeris, Location, SunTimes};
use crate::time_source::TimeSource;

/// Ephemeris returning the same UTC times of day for every date.
#[derive(Debug, Clone, Copy)]
pub struct FixedEphemeris {
    sunrise: NaiveTime,
    sunrise_end: NaiveTime,
    sunset_start: NaiveTime,
    sunset: NaiveTime,
}

impl FixedEphemeris {
    pub fn new(
        sunrise: NaiveTime,
        sunrise_end: NaiveTime,
        sunset_start: NaiveTime,
        sunset: NaiveTime,
    ) -> Self {
        Self {
            sunrise,
            sunrise_end,
            sunset_start,
            sunset,
        }
    }

    /// A round-number equinox day: 06:00, 06:30, 19:30 and 20:00 UTC.
    pub fn london() -> Self {
        let hm = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
        Self::new(hm(6, 0), hm(6, 30), hm(19, 30), hm(20, 0))
    }
}

impl Ephemeris for FixedEphemeris {
    fn sun_times(&self, date: NaiveDate, _location: &Location) -> SunTimes {
        let on = |time: NaiveTime| Utc.from_utc_datetime(&date.and_time(time));
        SunTimes::new(
            on(self.sunrise),
            on(self.sunrise_end),
            on(self.sunset_start),
            on(self.sunset),
        )
    }
}

/// Clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<DateTime<Local>>,
}

impl ManualClock {
    pub fn new<Tz: TimeZone>(now: DateTime<Tz>) -> Self {
        Self {
            now: Mutex::new(now.with_timezone(&Local)),
        }
    }

    pub fn set<Tz: TimeZone>(&self, now: DateTime<Tz>) {
        *self.now.lock().unwrap() = now.with_timezone(&Local);
    }

    pub fn advance(&self, by: ChronoDuration) {
        *self.now.lock().unwrap() += by;
    }

    pub fn now_utc(&self) -> DateTime<Utc> {
        self.now.lock().unwrap().with_timezone(&Utc)
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> DateTime<Local> {
        *self.now.lock().unwrap()
    }

    fn sleep(&self, duration: StdDuration) {
        self.advance(ChronoDuration::milliseconds(duration.as_millis() as i64));
    }

    fn is_simulated(&self) -> bool {
        true
    }
}

/// Timer that records what the scheduler asked of it.
#[derive(Debug, Default)]
pub struct RecordingTimer {
    pub pending: Option<StdDuration>,
    pub armed: Vec<StdDuration>,
    pub cancelled: usize,
}

impl Timer for RecordingTimer {
    fn arm(&mut self, delay: StdDuration) {
        self.pending = Some(delay);
        self.armed.push(delay);
    }

    fn cancel(&mut self) {
        self.pending = None;
        self.cancelled += 1;
    }

    fn remaining(&self) -> Option<StdDuration> {
        self.pending
    }
}

/// Sink collecting every published reading.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    readings: Arc<Mutex<Vec<LightReading>>>,
}

impl RecordingSink {
    pub fn readings(&self) -> Vec<LightReading> {
        self.readings.lock().unwrap().clone()
    }

    pub fn values(&self) -> Vec<f64> {
        self.readings().iter().map(|r| r.illuminance).collect()
    }
}

impl ValueSink for RecordingSink {
    fn on_value_change(&mut self, reading: &LightReading) {
        self.readings.lock().unwrap().push(*reading);
    }
}
