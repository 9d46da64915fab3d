//! Time source abstraction for supporting both real-time and simulated time.
//!
//! Components that need the current instant receive an `Arc<dyn TimeSource>`
//! explicitly. A process-wide instance is also installed at startup so the
//! logger can stamp simulated output without threading the handle through
//! every macro call.

use chrono::{DateTime, Duration as ChronoDuration, Local, TimeZone};
use once_cell::sync::OnceCell;
use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;

/// Global time source instance, defaults to RealTimeSource
static TIME_SOURCE: OnceCell<Arc<dyn TimeSource>> = OnceCell::new();

/// Trait for abstracting time operations
pub trait TimeSource: Send + Sync {
    /// Get the current time
    fn now(&self) -> DateTime<Local>;

    /// Sleep for the specified duration (or simulate it)
    fn sleep(&self, duration: StdDuration);

    /// Check if this is a simulated time source
    fn is_simulated(&self) -> bool;

    /// Check if simulation has ended (always false for real time)
    fn is_ended(&self) -> bool {
        false
    }
}

/// Real-time implementation that uses actual system time
pub struct RealTimeSource;

impl TimeSource for RealTimeSource {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn sleep(&self, duration: StdDuration) {
        std::thread::sleep(duration);
    }

    fn is_simulated(&self) -> bool {
        false
    }
}

/// Simulated time source for time-accelerated execution.
///
/// Simulated time only advances through `sleep`. Two modes are supported:
/// - Linear acceleration: each sleep takes `duration / multiplier` of real time
/// - Fast-forward (multiplier = 0.0): sleeps complete almost instantly
pub struct SimulatedTimeSource {
    start_time: DateTime<Local>,
    end_time: DateTime<Local>,
    time_multiplier: f64,
    /// Simulated time elapsed since `start_time`
    elapsed: Mutex<ChronoDuration>,
}

impl SimulatedTimeSource {
    /// Create a new simulated time source.
    ///
    /// A negative multiplier falls back to one simulated hour per real second.
    pub fn new(start_time: DateTime<Local>, end_time: DateTime<Local>, multiplier: f64) -> Self {
        let time_multiplier = if multiplier == 0.0 {
            0.0
        } else if multiplier < 0.0 {
            3600.0
        } else {
            multiplier
        };

        Self {
            start_time,
            end_time,
            time_multiplier,
            elapsed: Mutex::new(ChronoDuration::zero()),
        }
    }

    fn current_time(&self) -> DateTime<Local> {
        let elapsed = *self.elapsed.lock().unwrap();
        (self.start_time + elapsed).min(self.end_time)
    }

    fn is_fast_forward(&self) -> bool {
        self.time_multiplier == 0.0
    }
}

impl TimeSource for SimulatedTimeSource {
    fn now(&self) -> DateTime<Local> {
        self.current_time()
    }

    fn sleep(&self, duration: StdDuration) {
        // Cap at end time to ensure clean termination
        let remaining = (self.end_time - self.current_time())
            .to_std()
            .unwrap_or(StdDuration::ZERO);
        let step = duration.min(remaining);

        if self.is_fast_forward() {
            // Let other threads run and logs flush
            std::thread::sleep(StdDuration::from_millis(1));
        } else if step > StdDuration::ZERO {
            std::thread::sleep(StdDuration::from_secs_f64(
                step.as_secs_f64() / self.time_multiplier,
            ));
        }

        let mut elapsed = self.elapsed.lock().unwrap();
        *elapsed += ChronoDuration::milliseconds(step.as_millis() as i64);
    }

    fn is_simulated(&self) -> bool {
        true
    }

    fn is_ended(&self) -> bool {
        self.current_time() >= self.end_time
    }
}

/// Initialize the global time source (call once at startup)
pub fn init_time_source(source: Arc<dyn TimeSource>) {
    TIME_SOURCE.set(source).ok();
}

/// Check if the time source has been initialized
pub fn is_initialized() -> bool {
    TIME_SOURCE.get().is_some()
}

/// The global time source, falling back to real time.
pub fn global() -> Arc<dyn TimeSource> {
    TIME_SOURCE.get_or_init(|| Arc::new(RealTimeSource)).clone()
}

/// Get the current time from the global time source
pub fn now() -> DateTime<Local> {
    TIME_SOURCE.get_or_init(|| Arc::new(RealTimeSource)).now()
}

/// Check if we're running in simulation mode
pub fn is_simulated() -> bool {
    TIME_SOURCE
        .get_or_init(|| Arc::new(RealTimeSource))
        .is_simulated()
}

/// Parse a datetime string in the format "YYYY-MM-DD HH:MM:SS"
pub fn parse_datetime(s: &str) -> Result<DateTime<Local>, String> {
    use chrono::NaiveDateTime;

    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map_err(|e| format!("Invalid datetime format: {e}. Use YYYY-MM-DD HH:MM:SS"))?;

    Local
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| "Ambiguous or invalid local time".to_string())
}
