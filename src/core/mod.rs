//! Core sensor logic and the runtime loop that drives it.
//!
//! - [`phase`]: pure phase classification and illuminance mapping
//! - [`timer`]: one-shot timer abstraction
//! - [`scheduler`]: the self-rescheduling refresh state machine
//!
//! [`Core`] owns a running scheduler and blocks between refreshes, waking
//! early when a signal arrives. Reload signals re-read the configuration and
//! restart the scheduler with the new location.

pub mod phase;
pub mod scheduler;
pub mod timer;

use anyhow::Result;
use std::sync::atomic::Ordering;
use std::sync::mpsc::RecvTimeoutError;
use std::thread::JoinHandle;
use std::time::Duration;

use crate::{
    config::{self, Config},
    core::{
        scheduler::Scheduler,
        timer::{DeadlineTimer, Timer},
    },
    io::signals::{SignalMessage, SignalState},
    sensor::{DaylightSensor, solar_date},
};

/// How often simulated waits check for pending signals.
const SIGNAL_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Parameters for creating a Core instance.
pub(crate) struct CoreParams {
    pub scheduler: Scheduler<DeadlineTimer>,
    pub config: Config,
    pub signal_state: SignalState,
    pub debug_enabled: bool,
}

/// Runtime driver for the scheduler.
pub(crate) struct Core {
    scheduler: Scheduler<DeadlineTimer>,
    config: Config,
    signal_state: SignalState,
    debug_enabled: bool,
    signals_connected: bool,
    /// Simulated sleep still advancing the clock after a signal cut the wait short
    sleeper: Option<JoinHandle<()>>,
}

impl Core {
    pub fn new(params: CoreParams) -> Self {
        Self {
            scheduler: params.scheduler,
            config: params.config,
            signal_state: params.signal_state,
            debug_enabled: params.debug_enabled,
            signals_connected: true,
            sleeper: None,
        }
    }

    /// Start the scheduler and run until shutdown or the end of a simulation.
    pub fn execute(mut self) -> Result<()> {
        if self.debug_enabled {
            self.log_sun_times();
        }

        self.scheduler.start();
        self.main_loop()?;

        log_block_start!("Shutting down daylight...");
        self.scheduler.stop();
        log_end!();

        Ok(())
    }

    fn main_loop(&mut self) -> Result<()> {
        let clock = self.scheduler.sensor().clock().clone();

        while self.signal_state.running.load(Ordering::SeqCst) && !clock.is_ended() {
            let Some(wait) = self.scheduler.timer().remaining() else {
                log_pipe!();
                log_warning!("No refresh is scheduled, stopping");
                break;
            };

            if !self.signals_connected {
                self.wait_without_signals(wait);
                continue;
            }

            let recv_result = if clock.is_simulated() {
                self.wait_simulated(wait)
            } else {
                self.signal_state.signal_receiver.recv_timeout(wait)
            };

            match recv_result {
                Ok(SignalMessage::Shutdown) => {
                    self.signal_state.running.store(false, Ordering::SeqCst);
                    log_pipe!();
                    log_info!("Received shutdown signal");
                }
                Ok(SignalMessage::Reload) => self.handle_reload(),
                Err(RecvTimeoutError::Timeout) => {
                    // Woken before the deadline (e.g. wall clock adjusted): wait again
                    if self.scheduler.timer().remaining() == Some(Duration::ZERO) {
                        self.scheduler.tick();
                    }
                }
                Err(RecvTimeoutError::Disconnected) => {
                    // Keep refreshing on schedule without signal support
                    self.signals_connected = false;
                    log_pipe!();
                    log_critical!("Signal handler disconnected unexpectedly");
                    log_indented!("Signals will no longer be processed");
                }
            }
        }

        Ok(())
    }

    /// Advance simulated time in a helper thread while polling for signals.
    ///
    /// A sleep interrupted by a signal keeps running and is resumed by the
    /// next wait, so the clock is only ever advanced by one sleeper.
    fn wait_simulated(&mut self, wait: Duration) -> Result<SignalMessage, RecvTimeoutError> {
        let sleeper = match self.sleeper.take() {
            Some(pending) if !pending.is_finished() => pending,
            finished => {
                if let Some(handle) = finished {
                    let _ = handle.join();
                }
                let clock = self.scheduler.sensor().clock().clone();
                std::thread::spawn(move || clock.sleep(wait))
            }
        };

        loop {
            match self
                .signal_state
                .signal_receiver
                .recv_timeout(SIGNAL_POLL_INTERVAL)
            {
                Ok(msg) => {
                    self.sleeper = Some(sleeper);
                    break Ok(msg);
                }
                Err(RecvTimeoutError::Timeout) if !sleeper.is_finished() => continue,
                Err(e) => {
                    let _ = sleeper.join();
                    break Err(e);
                }
            }
        }
    }

    fn wait_without_signals(&mut self, wait: Duration) {
        self.scheduler.sensor().clock().sleep(wait);
        if self.scheduler.timer().remaining() == Some(Duration::ZERO) {
            self.scheduler.tick();
        }
    }

    fn handle_reload(&mut self) {
        log_pipe!();
        log_info!("Reloading configuration");

        let clock = self.scheduler.sensor().clock().clone();
        let reloaded = config::load().and_then(|config| {
            let sensor = DaylightSensor::from_config(&config, clock)?;
            Ok((config, sensor))
        });

        match reloaded {
            Ok((config, sensor)) => {
                self.config = config;
                self.config.log_config();
                self.scheduler.restart(sensor);
                if self.debug_enabled {
                    self.log_sun_times();
                }
            }
            Err(e) => {
                log_warning!("Failed to reload configuration: {e}");
                log_indented!("Keeping the previous location");
            }
        }
    }

    fn log_sun_times(&self) {
        let sensor = self.scheduler.sensor();
        let now = sensor.now();
        let (today, _) = sensor.sun_times(now);

        log_pipe!();
        log_debug!("Sun events for {}:", solar_date(now, &sensor.location()));
        today.log_times();
    }
}
