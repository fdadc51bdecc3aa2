#![deny(missing_docs)]
//! Shared logging utilities for the restore panel workspace.
//!
//! This crate provides the `panel_*` logging macros used across the codebase,
//! a thread-local run context that tags log lines with the active run, and a
//! minimal test initializer for the global logger.

use std::cell::RefCell;

thread_local! {
    /// Thread-local storage for the run token currently owned by the event loop.
    static RUN_CONTEXT: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Records the active run for the current thread.
/// The event loop calls this whenever a run starts or is superseded.
pub fn set_run_context(run_id: Option<&str>) {
    RUN_CONTEXT.with(|v| *v.borrow_mut() = run_id.map(ToOwned::to_owned));
}

/// Returns the active run recorded for the current thread, or `"-"` when idle.
pub fn run_context() -> String {
    RUN_CONTEXT.with(|v| v.borrow().clone().unwrap_or_else(|| "-".to_string()))
}

/// Logs a trace-level message tagged with the current run context.
#[macro_export]
macro_rules! panel_trace {
    ($($arg:tt)*) => {{
        log::trace!("[run {}] {}", $crate::run_context(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message tagged with the current run context.
#[macro_export]
macro_rules! panel_debug {
    ($($arg:tt)*) => {{
        log::debug!("[run {}] {}", $crate::run_context(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message tagged with the current run context.
#[macro_export]
macro_rules! panel_info {
    ($($arg:tt)*) => {{
        log::info!("[run {}] {}", $crate::run_context(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message tagged with the current run context.
#[macro_export]
macro_rules! panel_warn {
    ($($arg:tt)*) => {{
        log::warn!("[run {}] {}", $crate::run_context(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message tagged with the current run context.
#[macro_export]
macro_rules! panel_error {
    ($($arg:tt)*) => {{
        log::error!("[run {}] {}", $crate::run_context(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Trace in debug builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Trace
    } else {
        log::LevelFilter::Info
    };

    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
