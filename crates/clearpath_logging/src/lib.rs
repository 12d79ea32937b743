#![deny(missing_docs)]
//! Shared logging utilities for the clearpath workspace.
//!
//! This crate provides the `cp_*` logging macros used across the codebase,
//! the process-wide logger initializer used by the CLI, and a minimal test
//! initializer for the global logger.

use std::fs::File;
use std::path::PathBuf;

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

/// File written by the `File` and `Both` destinations, relative to the
/// current working directory.
pub const LOG_FILENAME: &str = "clearpath.log";

const QUIET_TARGETS: &[&str] = &["hyper", "reqwest", "rustls", "h2"];

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! cp_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! cp_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! cp_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! cp_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! cp_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Destination for log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogDestination {
    /// Write to `./clearpath.log` in the current directory.
    #[default]
    File,
    /// Write to stderr, leaving stdout to the rendered results.
    Terminal,
    /// Write to both file and terminal.
    Both,
}

impl LogDestination {
    fn writes_file(self) -> bool {
        matches!(self, LogDestination::File | LogDestination::Both)
    }

    fn writes_terminal(self) -> bool {
        matches!(self, LogDestination::Terminal | LogDestination::Both)
    }
}

/// Installs the global logger for `destination` at `level`.
///
/// HTTP stack crates are filtered out so only clearpath records are kept.
/// Calling this again after a logger is installed does nothing.
pub fn initialize(destination: LogDestination, level: LevelFilter) {
    let config = build_config();
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    if destination.writes_terminal() {
        loggers.push(TermLogger::new(
            level,
            config.clone(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ));
    }
    if destination.writes_file() {
        if let Some(file_logger) = create_file_logger(level, config) {
            loggers.push(file_logger);
        }
    }
    if loggers.is_empty() {
        return;
    }
    let _ = CombinedLogger::init(loggers);
}

/// Terminal logger for tests. Every test may call it; only the first
/// call in a process installs anything.
pub fn initialize_for_tests() {
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        build_config(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

fn build_config() -> Config {
    let mut builder = ConfigBuilder::new();
    builder
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error);
    for noisy in QUIET_TARGETS {
        builder.add_filter_ignore_str(*noisy);
    }
    builder.build()
}

fn create_file_logger(level: LevelFilter, config: Config) -> Option<Box<WriteLogger<File>>> {
    let log_path = PathBuf::from(".").join(LOG_FILENAME);
    File::create(&log_path)
        .map(|file| WriteLogger::new(level, config, file))
        .map_err(|err| eprintln!("clearpath: cannot write {}: {err}", log_path.display()))
        .ok()
}
