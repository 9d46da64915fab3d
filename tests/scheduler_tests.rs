use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;

use daylight::common::constants::UPDATE_INTERVAL;
use daylight::core::scheduler::{Scheduler, SchedulerState};
use daylight::core::timer::{DeadlineTimer, Timer};
use daylight::geo::Location;
use daylight::testing::{FixedEphemeris, ManualClock, RecordingSink, RecordingTimer};
use daylight::time_source::TimeSource;
use daylight::{DaylightSensor, Phase};

fn utc(d: u32, h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, d, h, m, 0).unwrap()
}

fn sensor(clock: &Arc<ManualClock>) -> DaylightSensor {
    DaylightSensor::new(
        "Test",
        Location::new(51.5, -0.12).unwrap(),
        Arc::new(FixedEphemeris::london()),
        clock.clone(),
    )
}

/// Drive the scheduler by jumping the clock to each armed deadline.
fn run_until<T: Timer>(scheduler: &mut Scheduler<T>, clock: &ManualClock, end: DateTime<Utc>) {
    scheduler.start();
    while clock.now_utc() < end {
        let Some(wait) = scheduler.timer().remaining() else {
            break;
        };
        clock.sleep(wait);
        scheduler.tick();
    }
}

#[test]
fn test_full_day_cycle() {
    let clock = Arc::new(ManualClock::new(utc(20, 0, 0)));
    let sink = RecordingSink::default();
    let mut scheduler = Scheduler::new(sensor(&clock), RecordingTimer::default(), sink.clone());

    scheduler.start();
    let mut phases = vec![scheduler.last_reading().unwrap().phase];
    while clock.now_utc() < utc(21, 0, 0) {
        let wait = scheduler.timer().remaining().unwrap();
        clock.sleep(wait);
        scheduler.tick();

        let phase = scheduler.last_reading().unwrap().phase;
        if phases.last() != Some(&phase) {
            phases.push(phase);
        }
    }

    assert_eq!(
        phases,
        vec![
            Phase::Down,
            Phase::Rising,
            Phase::Up,
            Phase::Setting,
            Phase::Down,
            Phase::Rising
        ]
    );

    // One publication per second through both 30 minute transitions, plus the
    // initial value, the ends of both transitions and the next sunrise.
    let published = sink.values().len();
    assert!((3600..=3610).contains(&published), "{published}");
}

#[test]
fn test_steady_phases_sleep_until_next_boundary() {
    let clock = Arc::new(ManualClock::new(utc(20, 12, 0)));
    let mut scheduler = Scheduler::new(sensor(&clock), RecordingTimer::default(), |_: f64| {});

    scheduler.start();
    assert_eq!(
        scheduler.timer().armed,
        vec![std::time::Duration::from_secs(7 * 3600 + 1800)]
    );

    clock.set(utc(20, 21, 0));
    scheduler.tick();
    assert_eq!(
        scheduler.state(),
        SchedulerState::Armed {
            next_update: utc(21, 6, 0)
        }
    );
    assert_eq!(
        scheduler.timer().pending,
        Some(std::time::Duration::from_secs(9 * 3600))
    );
}

#[test]
fn test_transition_values_track_the_curve() {
    let clock = Arc::new(ManualClock::new(utc(20, 6, 0)));
    let sink = RecordingSink::default();
    let mut scheduler = Scheduler::new(sensor(&clock), RecordingTimer::default(), sink.clone());

    run_until(&mut scheduler, &clock, utc(20, 6, 30));

    let rising: Vec<_> = sink
        .readings()
        .into_iter()
        .filter(|r| r.phase == Phase::Rising)
        .collect();
    assert_eq!(rising.len(), 1800);
    assert_eq!(rising[0].illuminance, 0.0001);
    assert!(rising.windows(2).all(|w| w[0].illuminance < w[1].illuminance));
    assert!(
        scheduler
            .timer()
            .armed
            .iter()
            .take(1800)
            .all(|delay| *delay == UPDATE_INTERVAL)
    );

    let last = sink.readings().last().copied().unwrap();
    assert_eq!(last.phase, Phase::Up);
    assert_eq!(last.illuminance, 100000.0);
}

#[test]
fn test_stop_then_start_resumes_from_current_time() {
    let clock = Arc::new(ManualClock::new(utc(20, 3, 0)));
    let sink = RecordingSink::default();
    let mut scheduler = Scheduler::new(sensor(&clock), RecordingTimer::default(), sink.clone());

    scheduler.start();
    scheduler.stop();
    assert_eq!(scheduler.timer().pending, None);

    clock.set(utc(20, 19, 45));
    scheduler.tick();
    assert_eq!(sink.values().len(), 1);

    scheduler.start();
    let last = sink.readings().last().copied().unwrap();
    assert_eq!(last.phase, Phase::Setting);
    assert_eq!(last.illuminance, 50000.0001);
}

#[test]
fn test_deadline_timer_drives_scheduler() {
    let clock = Arc::new(ManualClock::new(utc(20, 19, 59)));
    let sink = RecordingSink::default();
    let timer = DeadlineTimer::new(clock.clone());
    let mut scheduler = Scheduler::new(sensor(&clock), timer, sink.clone());

    run_until(&mut scheduler, &clock, utc(20, 20, 0));

    assert_eq!(sink.values().len(), 61);
    assert_eq!(scheduler.last_reading().unwrap().phase, Phase::Down);
    assert_eq!(
        scheduler.timer().deadline().map(|d| d.with_timezone(&Utc)),
        Some(utc(21, 6, 0))
    );
}
