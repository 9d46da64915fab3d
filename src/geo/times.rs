//! Sun event instants for one calendar day.

use chrono::{DateTime, Local, Utc};
use serde::Serialize;

/// The four sun events that bound the light phases of a day.
///
/// All instants are absolute (`Utc`), so comparisons across midnight and
/// between days need no special handling. The events are normally ordered
/// `sunrise ≤ sunrise_end ≤ sunset_start ≤ sunset`; the phase engine does not
/// rely on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SunTimes {
    /// Upper edge of the sun reaches the horizon (morning).
    pub sunrise: DateTime<Utc>,
    /// Bottom edge of the sun clears the horizon (morning).
    pub sunrise_end: DateTime<Utc>,
    /// Bottom edge of the sun touches the horizon (evening).
    pub sunset_start: DateTime<Utc>,
    /// Sun disappears below the horizon (evening).
    pub sunset: DateTime<Utc>,
}

impl SunTimes {
    pub fn new(
        sunrise: DateTime<Utc>,
        sunrise_end: DateTime<Utc>,
        sunset_start: DateTime<Utc>,
        sunset: DateTime<Utc>,
    ) -> Self {
        Self {
            sunrise,
            sunrise_end,
            sunset_start,
            sunset,
        }
    }

    /// True when the events follow their natural order.
    pub fn is_ordered(&self) -> bool {
        self.sunrise <= self.sunrise_end
            && self.sunrise_end <= self.sunset_start
            && self.sunset_start <= self.sunset
    }

    /// Push later events forward until the natural order holds.
    ///
    /// Only moves anything when events come from different estimates (for
    /// example a computed sunrise next to a solar-noon fallback) and disagree
    /// by a few minutes.
    pub fn into_ordered(self) -> Self {
        let sunrise_end = self.sunrise_end.max(self.sunrise);
        let sunset_start = self.sunset_start.max(sunrise_end);
        let sunset = self.sunset.max(sunset_start);
        Self::new(self.sunrise, sunrise_end, sunset_start, sunset)
    }

    /// Select the day whose light cycle governs `now`.
    ///
    /// Today's events apply until today's sunset has passed; from then on
    /// tomorrow's do. Every boundary of the result that lies ahead of `now` is
    /// therefore its next occurrence, and the sunrise to wake up for is always
    /// the upcoming one.
    pub fn effective<'a>(now: DateTime<Utc>, today: &'a Self, tomorrow: &'a Self) -> &'a Self {
        if today.sunset > now { today } else { tomorrow }
    }

    /// Log the events in local time.
    pub fn log_times(&self) {
        let local = |t: DateTime<Utc>| t.with_timezone(&Local).format("%H:%M:%S").to_string();
        log_indented!("Sunrise:       {}", local(self.sunrise));
        log_indented!("Sunrise end:   {}", local(self.sunrise_end));
        log_indented!("Sunset start:  {}", local(self.sunset_start));
        log_indented!("Sunset:        {}", local(self.sunset));
    }
}
