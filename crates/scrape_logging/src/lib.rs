#![deny(missing_docs)]
//! Shared logging utilities for the clipharvest workspace.
//!
//! This crate provides the `scrape_*` logging macros used across the codebase,
//! a thread-local harvest-round context, and minimal logger initializers for
//! tests and binaries.

use std::cell::Cell;

thread_local! {
    /// Thread-local storage for the current harvest round index (1-based).
    static HARVEST_ROUND: Cell<u64> = const { Cell::new(0) };
}

/// Sets the harvest round index for the current thread.
/// The feed harvester calls this once at the top of each round.
pub fn set_round(round: u64) {
    HARVEST_ROUND.with(|v| v.set(round));
}

/// Retrieves the harvest round index for the current thread.
/// Returns 0 outside of a harvest loop.
pub fn get_round() -> u64 {
    HARVEST_ROUND.with(|v| v.get())
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! scrape_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! scrape_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! scrape_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! scrape_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! scrape_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    init_terminal_logger();
}

/// Initializes the terminal logger for binaries.
///
/// Safe to call more than once; later calls are ignored.
pub fn initialize_terminal() {
    init_terminal_logger();
}

fn init_terminal_logger() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set elsewhere.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
