//! Self-rescheduling refresh of the published light level.
//!
//! The scheduler is a two-state machine. While `Idle` nothing is pending and
//! timer fires are ignored. `start` publishes a reading immediately and arms
//! the timer for the reading's `next_update`; every `tick` repeats that, so the
//! timer is re-armed from inside its own expiry. At most one wake-up is ever
//! pending, and `stop` cancels it.

use chrono::{DateTime, Utc};
use std::time::Duration as StdDuration;

use crate::common::constants::MIN_TIMER_DELAY;
use crate::core::phase::LightReading;
use crate::core::timer::Timer;
use crate::sensor::DaylightSensor;

/// Receiver of published readings.
///
/// Any `FnMut(f64)` closure is a sink that only sees the illuminance.
pub trait ValueSink {
    fn on_value_change(&mut self, reading: &LightReading);
}

impl<F: FnMut(f64)> ValueSink for F {
    fn on_value_change(&mut self, reading: &LightReading) {
        self(reading.illuminance)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Armed { next_update: DateTime<Utc> },
}

pub struct Scheduler<T: Timer> {
    sensor: DaylightSensor,
    timer: T,
    sink: Box<dyn ValueSink>,
    state: SchedulerState,
    last_reading: Option<LightReading>,
}

impl<T: Timer> Scheduler<T> {
    pub fn new(sensor: DaylightSensor, timer: T, sink: impl ValueSink + 'static) -> Self {
        Self {
            sensor,
            timer,
            sink: Box::new(sink),
            state: SchedulerState::Idle,
            last_reading: None,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, SchedulerState::Armed { .. })
    }

    pub fn last_reading(&self) -> Option<&LightReading> {
        self.last_reading.as_ref()
    }

    pub fn sensor(&self) -> &DaylightSensor {
        &self.sensor
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// Publish the current value and arm the timer.
    ///
    /// Does nothing when already running.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        self.refresh();
    }

    /// Handle a timer expiry. Ignored unless running.
    pub fn tick(&mut self) {
        if !self.is_running() {
            return;
        }
        self.refresh();
    }

    /// Cancel the pending wake-up. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if self.is_running() {
            self.timer.cancel();
            self.state = SchedulerState::Idle;
        }
    }

    /// Swap in a new sensor and start again from a fresh reading.
    pub fn restart(&mut self, sensor: DaylightSensor) {
        self.stop();
        self.sensor = sensor;
        self.last_reading = None;
        self.start();
    }

    fn refresh(&mut self) {
        let now = self.sensor.now();
        let reading = self.sensor.reading_at(now);

        self.publish(&reading);

        self.timer.arm(delay_until(now, reading.next_update));
        self.state = SchedulerState::Armed {
            next_update: reading.next_update,
        };
    }

    fn publish(&mut self, reading: &LightReading) {
        self.sink.on_value_change(reading);
        self.last_reading = Some(*reading);
    }
}

/// Delay from `now` until `next_update`, never shorter than the minimum
/// timer delay.
pub fn delay_until(now: DateTime<Utc>, next_update: DateTime<Utc>) -> StdDuration {
    (next_update - now)
        .to_std()
        .unwrap_or(StdDuration::ZERO)
        .max(MIN_TIMER_DELAY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::phase::Phase;
    use crate::core::timer::MockTimer;
    use crate::geo::Location;
    use crate::testing::{FixedEphemeris, ManualClock, RecordingSink};
    use chrono::{Duration, TimeZone};
    use mockall::predicate::eq;
    use std::sync::{Arc, Mutex};

    fn utc(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 20, h, m, s).unwrap()
    }

    fn sensor(clock: &Arc<ManualClock>) -> DaylightSensor {
        DaylightSensor::new(
            "Test",
            Location::new(51.5, -0.12).unwrap(),
            Arc::new(FixedEphemeris::london()),
            clock.clone(),
        )
    }

    #[test]
    fn test_start_publishes_and_arms_until_sunset_start() {
        let clock = Arc::new(ManualClock::new(utc(12, 0, 0)));
        let sink = RecordingSink::default();

        let mut timer = MockTimer::new();
        timer
            .expect_arm()
            .with(eq(StdDuration::from_secs(7 * 3600 + 1800)))
            .times(1)
            .return_const(());

        let mut scheduler = Scheduler::new(sensor(&clock), timer, sink.clone());
        scheduler.start();

        assert_eq!(sink.values(), vec![100000.0]);
        assert_eq!(
            scheduler.state(),
            SchedulerState::Armed {
                next_update: utc(19, 30, 0)
            }
        );
    }

    #[test]
    fn test_start_twice_keeps_a_single_timer() {
        let clock = Arc::new(ManualClock::new(utc(12, 0, 0)));
        let sink = RecordingSink::default();

        let mut timer = MockTimer::new();
        timer.expect_arm().times(1).return_const(());

        let mut scheduler = Scheduler::new(sensor(&clock), timer, sink.clone());
        scheduler.start();
        scheduler.start();

        assert_eq!(sink.values().len(), 1);
    }

    #[test]
    fn test_tick_while_idle_is_ignored() {
        let clock = Arc::new(ManualClock::new(utc(12, 0, 0)));
        let sink = RecordingSink::default();

        let mut timer = MockTimer::new();
        timer.expect_arm().never();
        timer.expect_cancel().never();

        let mut scheduler = Scheduler::new(sensor(&clock), timer, sink.clone());
        scheduler.tick();

        assert!(sink.values().is_empty());
        assert_eq!(scheduler.state(), SchedulerState::Idle);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let clock = Arc::new(ManualClock::new(utc(12, 0, 0)));

        let mut timer = MockTimer::new();
        timer.expect_arm().times(1).return_const(());
        timer.expect_cancel().times(1).return_const(());

        let mut scheduler = Scheduler::new(sensor(&clock), timer, |_: f64| {});
        scheduler.stop();
        scheduler.start();
        scheduler.stop();
        scheduler.stop();

        assert!(!scheduler.is_running());
    }

    #[test]
    fn test_rising_ticks_every_second_and_brightens() {
        let clock = Arc::new(ManualClock::new(utc(6, 15, 0)));
        let sink = RecordingSink::default();

        let mut timer = MockTimer::new();
        timer
            .expect_arm()
            .with(eq(StdDuration::from_secs(1)))
            .times(3)
            .return_const(());

        let mut scheduler = Scheduler::new(sensor(&clock), timer, sink.clone());
        scheduler.start();
        for _ in 0..2 {
            clock.advance(Duration::seconds(1));
            scheduler.tick();
        }

        let values = sink.values();
        assert_eq!(values.len(), 3);
        assert!(values.windows(2).all(|w| w[0] < w[1]), "{values:?}");
        assert!(sink.readings().iter().all(|r| r.phase == Phase::Rising));
    }

    #[test]
    fn test_tick_at_boundary_moves_to_next_phase() {
        let clock = Arc::new(ManualClock::new(utc(12, 0, 0)));
        let sink = RecordingSink::default();

        let mut timer = MockTimer::new();
        timer.expect_arm().times(2).return_const(());

        let mut scheduler = Scheduler::new(sensor(&clock), timer, sink.clone());
        scheduler.start();
        clock.set(utc(19, 30, 0));
        scheduler.tick();

        let phases: Vec<Phase> = sink.readings().iter().map(|r| r.phase).collect();
        assert_eq!(phases, vec![Phase::Up, Phase::Setting]);
        assert_eq!(sink.values()[1], 100000.0);
        assert_eq!(scheduler.last_reading().map(|r| r.next_update), Some(utc(19, 30, 1)));
    }

    #[test]
    fn test_restart_publishes_from_new_sensor() {
        let clock = Arc::new(ManualClock::new(utc(3, 0, 0)));
        let sink = RecordingSink::default();

        let mut timer = MockTimer::new();
        timer.expect_arm().times(2).return_const(());
        timer.expect_cancel().times(1).return_const(());

        let mut scheduler = Scheduler::new(sensor(&clock), timer, sink.clone());
        scheduler.start();
        scheduler.restart(sensor(&clock));

        assert_eq!(sink.values(), vec![0.0001, 0.0001]);
        assert!(scheduler.is_running());
    }

    #[test]
    fn test_closure_sink_receives_illuminance() {
        let clock = Arc::new(ManualClock::new(utc(6, 15, 0)));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = seen.clone();

        let mut timer = MockTimer::new();
        timer.expect_arm().return_const(());

        let mut scheduler = Scheduler::new(sensor(&clock), timer, move |value: f64| {
            recorder.lock().unwrap().push(value);
        });
        scheduler.start();

        assert_eq!(*seen.lock().unwrap(), vec![50000.0001]);
    }

    #[test]
    fn test_delay_never_below_minimum() {
        let now = utc(12, 0, 0);

        assert_eq!(delay_until(now, now), MIN_TIMER_DELAY);
        assert_eq!(delay_until(now, now - Duration::seconds(5)), MIN_TIMER_DELAY);
        assert_eq!(
            delay_until(now, now + Duration::milliseconds(1500)),
            StdDuration::from_millis(1500)
        );
    }
}
