//! One-shot timer abstraction used by the scheduler.
//!
//! The scheduler only decides *when* it wants to be woken; how the wait is
//! performed belongs to the runtime. Keeping that behind [`Timer`] lets the
//! scheduling policy be tested without sleeping.

use chrono::{DateTime, Duration as ChronoDuration, Local};
use std::sync::Arc;
use std::time::Duration as StdDuration;

use crate::time_source::TimeSource;

/// A single one-shot timer.
///
/// Arming replaces any pending deadline, so at most one wake-up is ever
/// outstanding.
#[cfg_attr(test, mockall::automock)]
pub trait Timer {
    /// Arm the timer to fire after `delay`.
    fn arm(&mut self, delay: StdDuration);

    /// Cancel the pending deadline, if any.
    fn cancel(&mut self);

    /// Time left until the pending deadline, `None` when nothing is armed.
    fn remaining(&self) -> Option<StdDuration>;
}

/// Timer whose deadline is measured on a [`TimeSource`].
///
/// Works with real and simulated time alike; the runtime loop waits for
/// [`Timer::remaining`] and then ticks the scheduler.
pub struct DeadlineTimer {
    clock: Arc<dyn TimeSource>,
    deadline: Option<DateTime<Local>>,
}

impl DeadlineTimer {
    pub fn new(clock: Arc<dyn TimeSource>) -> Self {
        Self {
            clock,
            deadline: None,
        }
    }

    pub fn deadline(&self) -> Option<DateTime<Local>> {
        self.deadline
    }
}

impl Timer for DeadlineTimer {
    fn arm(&mut self, delay: StdDuration) {
        let delay = ChronoDuration::milliseconds(delay.as_millis() as i64);
        self.deadline = Some(self.clock.now() + delay);
    }

    fn cancel(&mut self) {
        self.deadline = None;
    }

    fn remaining(&self) -> Option<StdDuration> {
        self.deadline.map(|deadline| {
            (deadline - self.clock.now())
                .to_std()
                .unwrap_or(StdDuration::ZERO)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time_source::{SimulatedTimeSource, parse_datetime};

    fn clock() -> Arc<dyn TimeSource> {
        Arc::new(SimulatedTimeSource::new(
            parse_datetime("2026-03-20 06:00:00").unwrap(),
            parse_datetime("2026-03-21 06:00:00").unwrap(),
            0.0,
        ))
    }

    #[test]
    fn test_unarmed_timer_has_nothing_remaining() {
        let timer = DeadlineTimer::new(clock());
        assert_eq!(timer.remaining(), None);
    }

    #[test]
    fn test_remaining_counts_down_with_the_clock() {
        let clock = clock();
        let mut timer = DeadlineTimer::new(clock.clone());

        timer.arm(StdDuration::from_secs(60));
        assert_eq!(timer.remaining(), Some(StdDuration::from_secs(60)));

        clock.sleep(StdDuration::from_secs(45));
        assert_eq!(timer.remaining(), Some(StdDuration::from_secs(15)));

        clock.sleep(StdDuration::from_secs(30));
        assert_eq!(timer.remaining(), Some(StdDuration::ZERO));
    }

    #[test]
    fn test_rearming_replaces_deadline() {
        let mut timer = DeadlineTimer::new(clock());

        timer.arm(StdDuration::from_secs(3600));
        timer.arm(StdDuration::from_secs(1));
        assert_eq!(timer.remaining(), Some(StdDuration::from_secs(1)));

        timer.cancel();
        assert_eq!(timer.remaining(), None);
        assert_eq!(timer.deadline(), None);
    }
}
