//! Command-line command handlers.
//!
//! Each one-shot command lives in its own submodule.

pub mod get;
pub mod simulate;
