/*
 * Error types for the logger
 *
 * Leveled calls never return errors. These surface only from initialization,
 * reconfiguration and the file store's internal operations.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while configuring the logger or touching the log directory.
///
/// Leveled logging calls never return these; they are absorbed inside the
/// engine. Only initialization and reconfiguration surface them to the caller.
#[derive(Error, Debug)]
pub enum LogError {
    /// File system operation on a log path failed
    #[error("IO error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed
    #[error("Config error: {0}")]
    Config(String),

    /// A level name that is not one of the six severities (or all/none)
    #[error("Unknown log level: {0}")]
    UnknownLevel(String),

    /// The session file at this path already holds records of this process,
    /// so the log directory can no longer move
    #[error("Log directory is fixed once '{}' has been written", .0.display())]
    SessionActive(PathBuf),

    /// The process-wide logger was already installed
    #[error("Logger already initialized")]
    AlreadyInitialized,
}

impl LogError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LogError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias using LogError
pub type LogResult<T> = Result<T, LogError>;
