//! Unix signal handling for the sensor loop.
//!
//! A dedicated thread owns the `signal-hook` iterator and forwards each signal
//! as a [`SignalMessage`] over an mpsc channel. The runtime loop waits on that
//! channel with a timeout, so a signal interrupts the wait for the next
//! scheduled refresh immediately.

use anyhow::{Context, Result};
use signal_hook::{
    consts::signal::{SIGHUP, SIGINT, SIGTERM, SIGUSR2},
    iterator::Signals,
};
use std::{
    sync::Arc,
    sync::atomic::{AtomicBool, Ordering},
    sync::mpsc::{Receiver, Sender},
    thread,
};

/// Message delivered to the runtime loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalMessage {
    /// Re-read the configuration and restart the scheduler (SIGHUP, SIGUSR2)
    Reload,
    /// Stop the scheduler and exit (SIGINT, SIGTERM)
    Shutdown,
}

/// Signal handling state shared between threads
pub struct SignalState {
    /// Cleared once a shutdown signal has been received
    pub running: Arc<AtomicBool>,
    pub signal_receiver: Receiver<SignalMessage>,
    /// Kept so tests and the runtime can inject messages
    pub signal_sender: Sender<SignalMessage>,
}

impl SignalState {
    /// State without an OS handler attached.
    pub fn detached() -> Self {
        let (signal_sender, signal_receiver) = std::sync::mpsc::channel();
        Self {
            running: Arc::new(AtomicBool::new(true)),
            signal_receiver,
            signal_sender,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Map a raw signal number to the message it triggers.
pub fn message_for(signal: i32) -> Option<SignalMessage> {
    match signal {
        SIGHUP | SIGUSR2 => Some(SignalMessage::Reload),
        SIGINT | SIGTERM => Some(SignalMessage::Shutdown),
        _ => None,
    }
}

/// Register the handlers and spawn the forwarding thread.
pub fn setup_signal_handler(debug_enabled: bool) -> Result<SignalState> {
    let state = SignalState::detached();

    let mut signals = Signals::new([SIGINT, SIGTERM, SIGHUP, SIGUSR2])
        .context("failed to register signal handlers")?;

    let running = state.running.clone();
    let sender = state.signal_sender.clone();

    thread::spawn(move || {
        for sig in signals.forever() {
            let Some(message) = message_for(sig) else {
                continue;
            };

            if debug_enabled {
                log_pipe!();
                log_debug!("Received signal {sig}, forwarding {message:?}");
            }

            if message == SignalMessage::Shutdown {
                running.store(false, Ordering::SeqCst);
            }

            if sender.send(message).is_err() || message == SignalMessage::Shutdown {
                break;
            }
        }
    });

    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_mapping() {
        assert_eq!(message_for(SIGUSR2), Some(SignalMessage::Reload));
        assert_eq!(message_for(SIGHUP), Some(SignalMessage::Reload));
        assert_eq!(message_for(SIGINT), Some(SignalMessage::Shutdown));
        assert_eq!(message_for(SIGTERM), Some(SignalMessage::Shutdown));
        assert_eq!(message_for(signal_hook::consts::signal::SIGUSR1), None);
    }

    #[test]
    fn test_detached_state_delivers_injected_messages() {
        let state = SignalState::detached();
        assert!(state.is_running());

        state.signal_sender.send(SignalMessage::Reload).unwrap();
        assert_eq!(state.signal_receiver.try_recv().unwrap(), SignalMessage::Reload);
    }
}
