/*
 * Main library entry point that exposes the public API
 *
 * This file defines the public interface for the logging library, including:
 * - Re-exporting the Logger facade and the LogEngine it wraps
 * - Re-exporting LogConfig, LogLevel and LevelMask for configuration
 * - Defining logging macros (log_trace .. log_fatal)
 *
 * The macros format their arguments with format! on the caller's side and
 * hand the finished message to the process-wide logger.
 */

pub mod clock;
pub mod config;
pub mod console;
pub mod engine;
pub mod error;
pub mod level;
mod logger;
pub mod store;

pub use config::LogConfig;
pub use engine::LogEngine;
pub use error::{LogError, LogResult};
pub use level::{LevelMask, LevelRegistry, LogLevel};
pub use logger::Logger;

#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)+) => {
        $crate::Logger::trace(&::std::format!($($arg)+))
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)+) => {
        $crate::Logger::info(&::std::format!($($arg)+))
    };
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)+) => {
        $crate::Logger::debug(&::std::format!($($arg)+))
    };
}

#[macro_export]
macro_rules! log_warning {
    ($($arg:tt)+) => {
        $crate::Logger::warning(&::std::format!($($arg)+))
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)+) => {
        $crate::Logger::error(&::std::format!($($arg)+))
    };
}

#[macro_export]
macro_rules! log_fatal {
    ($($arg:tt)+) => {
        $crate::Logger::fatal(&::std::format!($($arg)+))
    };
}
