//! Structured logging system with visual formatting.
//!
//! This module provides the box-drawing log output used by daylight. Every line
//! goes through [`emit`], which applies the layout of the calling macro and the
//! simulation timestamp prefix before writing to stdout.
//!
//! The logger supports runtime enable/disable functionality for quiet operation
//! during one-shot commands (`daylight get --json`) or testing.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

static LOGGING_ENABLED: AtomicBool = AtomicBool::new(true);

/// Main logging interface providing structured output formatting.
///
/// ## Logging Conventions
///
/// - **`log_block_start!`**: starts a new conceptual block (phase changes, configuration
///   loading, startup). Prints an empty pipe `┃` followed by `┣ message`.
/// - **`log_decorated!`**: a line that belongs to the current block. Prints `┣ message`.
/// - **`log_indented!`**: nested detail under the previous line. Prints `┃   message`.
/// - **`log_pipe!`**: a single empty `┃` line, used before `log_warning!`, `log_error!`
///   and friends when they open a block of their own.
/// - **`log_version!`**: the startup header `┏ daylight vX.Y.Z ━━╸`.
/// - **`log_end!`**: the final `╹` marker.
/// - **`log_info!`, `log_warning!`, `log_error!`, `log_debug!`, `log_critical!`**:
///   semantic messages with a colored `[LEVEL]` prefix.
pub struct Log;

impl Log {
    /// Enable or disable logging.
    pub fn set_enabled(enabled: bool) {
        LOGGING_ENABLED.store(enabled, Ordering::SeqCst);
    }

    /// Check if logging is currently enabled.
    pub fn is_enabled() -> bool {
        LOGGING_ENABLED.load(Ordering::SeqCst)
    }

    /// Timestamp prefix shown while running against simulated time.
    ///
    /// Returns an empty string for real time so normal output stays clean.
    pub fn get_timestamp_prefix() -> String {
        // Check without initializing the time source
        if crate::time_source::is_initialized() && crate::time_source::is_simulated() {
            format!("[{}] ", crate::time_source::now().format("%H:%M:%S"))
        } else {
            String::new()
        }
    }
}

/// Visual layout of a single log line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Layout {
    Decorated,
    Indented,
    Pipe,
    BlockStart,
    Version,
    End,
    /// `┣[LEVEL] message` with the level colored by the given ANSI code.
    Level(&'static str, &'static str),
    /// `┃` then `┗[ERROR] message`, terminating the flow.
    ErrorExit,
}

impl Layout {
    /// Render a message with this layout and the given prefix.
    pub fn render(self, prefix: &str, message: &str) -> String {
        match self {
            Layout::Decorated => format!("{prefix}┣ {message}\n"),
            Layout::Indented => format!("{prefix}┃   {message}\n"),
            Layout::Pipe => format!("{prefix}┃\n"),
            Layout::BlockStart => format!("{prefix}┃\n{prefix}┣ {message}\n"),
            Layout::Version => format!("{prefix}┏ daylight v{message} ━━╸\n"),
            Layout::End => format!("{prefix}╹\n"),
            Layout::Level(level, color) => {
                format!("{prefix}┣[\x1b[{color}m{level}\x1b[0m] {message}\n")
            }
            Layout::ErrorExit => {
                format!("{prefix}┃\n{prefix}┗[\x1b[31mERROR\x1b[0m] {message}\n")
            }
        }
    }
}

/// Format and write one log line if logging is enabled (needed by macros).
pub fn emit(layout: Layout, message: &str) {
    if Log::is_enabled() {
        let prefix = Log::get_timestamp_prefix();
        write_output(&layout.render(&prefix, message));
    }
}

fn write_output(text: &str) {
    let mut stdout = std::io::stdout().lock();
    let _ = stdout.write_all(text.as_bytes());
    let _ = stdout.flush();
}

// # Logging Macros

/// Log a decorated message, typically as part of an existing block.
#[macro_export]
macro_rules! log_decorated {
    ($fmt:literal $($arg:tt)*) => {
        $crate::logger::emit($crate::logger::Layout::Decorated, &format!($fmt $($arg)*))
    };
    ($expr:expr) => {
        $crate::logger::emit($crate::logger::Layout::Decorated, &$expr.to_string())
    };
}

/// Log an indented message for sub-items or details within a block.
#[macro_export]
macro_rules! log_indented {
    ($fmt:literal $($arg:tt)*) => {
        $crate::logger::emit($crate::logger::Layout::Indented, &format!($fmt $($arg)*))
    };
    ($expr:expr) => {
        $crate::logger::emit($crate::logger::Layout::Indented, &$expr.to_string())
    };
}

/// Log a visual pipe separator for vertical spacing.
#[macro_export]
macro_rules! log_pipe {
    () => {
        $crate::logger::emit($crate::logger::Layout::Pipe, "")
    };
}

/// Log a block start message, initiating a new conceptual block of information.
#[macro_export]
macro_rules! log_block_start {
    ($fmt:literal $($arg:tt)*) => {
        $crate::logger::emit($crate::logger::Layout::BlockStart, &format!($fmt $($arg)*))
    };
    ($expr:expr) => {
        $crate::logger::emit($crate::logger::Layout::BlockStart, &$expr.to_string())
    };
}

/// Log the application version header.
#[macro_export]
macro_rules! log_version {
    () => {
        $crate::logger::emit($crate::logger::Layout::Version, env!("CARGO_PKG_VERSION"))
    };
}

/// Log the final termination marker.
#[macro_export]
macro_rules! log_end {
    () => {
        $crate::logger::emit($crate::logger::Layout::End, "")
    };
}

/// Log a warning message with pipe prefix and yellow-colored text.
#[macro_export]
macro_rules! log_warning {
    ($fmt:literal $($arg:tt)*) => {
        $crate::logger::emit($crate::logger::Layout::Level("WARNING", "33"), &format!($fmt $($arg)*))
    };
    ($expr:expr) => {
        $crate::logger::emit($crate::logger::Layout::Level("WARNING", "33"), &$expr.to_string())
    };
}

/// Log an error message with pipe prefix and red-colored text.
#[macro_export]
macro_rules! log_error {
    ($fmt:literal $($arg:tt)*) => {
        $crate::logger::emit($crate::logger::Layout::Level("ERROR", "31"), &format!($fmt $($arg)*))
    };
    ($expr:expr) => {
        $crate::logger::emit($crate::logger::Layout::Level("ERROR", "31"), &$expr.to_string())
    };
}

/// Log an error that terminates the current flow.
#[macro_export]
macro_rules! log_error_exit {
    ($fmt:literal $($arg:tt)*) => {
        $crate::logger::emit($crate::logger::Layout::ErrorExit, &format!($fmt $($arg)*))
    };
    ($expr:expr) => {
        $crate::logger::emit($crate::logger::Layout::ErrorExit, &$expr.to_string())
    };
}

/// Log an informational message with pipe prefix and green-colored text.
#[macro_export]
macro_rules! log_info {
    ($fmt:literal $($arg:tt)*) => {
        $crate::logger::emit($crate::logger::Layout::Level("INFO", "32"), &format!($fmt $($arg)*))
    };
    ($expr:expr) => {
        $crate::logger::emit($crate::logger::Layout::Level("INFO", "32"), &$expr.to_string())
    };
}

/// Log a debug/operational message with pipe prefix and green-colored text.
#[macro_export]
macro_rules! log_debug {
    ($fmt:literal $($arg:tt)*) => {
        $crate::logger::emit($crate::logger::Layout::Level("DEBUG", "32"), &format!($fmt $($arg)*))
    };
    ($expr:expr) => {
        $crate::logger::emit($crate::logger::Layout::Level("DEBUG", "32"), &$expr.to_string())
    };
}

/// Log a critical message with pipe prefix and red-colored text.
#[macro_export]
macro_rules! log_critical {
    ($fmt:literal $($arg:tt)*) => {
        $crate::logger::emit($crate::logger::Layout::Level("CRITICAL", "31"), &format!($fmt $($arg)*))
    };
    ($expr:expr) => {
        $crate::logger::emit($crate::logger::Layout::Level("CRITICAL", "31"), &$expr.to_string())
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_start_opens_with_pipe() {
        assert_eq!(
            Layout::BlockStart.render("", "Sun is rising"),
            "┃\n┣ Sun is rising\n"
        );
    }

    #[test]
    fn test_prefix_repeated_on_every_line() {
        let rendered = Layout::ErrorExit.render("[06:15:00] ", "boom");
        assert!(rendered.starts_with("[06:15:00] ┃\n[06:15:00] ┗["));
        assert!(rendered.ends_with("boom\n"));
    }

    #[test]
    fn test_level_layout_colors_level_only() {
        assert_eq!(
            Layout::Level("WARNING", "33").render("", "careful"),
            "┣[\x1b[33mWARNING\x1b[0m] careful\n"
        );
    }
}
