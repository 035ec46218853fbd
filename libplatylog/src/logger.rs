/*
 * Process-wide logger facade
 *
 * Callers log from anywhere without holding a handle. The facade keeps one
 * LogEngine in a OnceCell:
 * - Logger::init* installs it from app_config.toml or an explicit LogConfig
 * - the first leveled call before any init installs a default engine
 *   (./logs, every level, five archives)
 *
 * If an engine already exists (installed earlier, or created by a setter or
 * log call made before init), init* reconfigures it in place instead of
 * discarding the config. Only install() of a prebuilt engine reports
 * AlreadyInitialized.
 */

use once_cell::sync::OnceCell;

use crate::config::{LogConfig, DEFAULT_CONFIG_FILE};
use crate::engine::LogEngine;
use crate::error::{LogError, LogResult};
use crate::level::{LevelMask, LogLevel};

// Global logger instance
static LOGGER_INSTANCE: OnceCell<LogEngine> = OnceCell::new();

pub struct Logger;

impl Logger {
    /// Initialize the logger from "app_config.toml", falling back to defaults
    pub fn init() {
        if let Err(e) = Self::init_with_config_file(DEFAULT_CONFIG_FILE) {
            println!("Failed to initialize logger: {}", e);
        }
    }

    /// Initialize the logger with a specific configuration file
    pub fn init_with_config_file(config_path: &str) -> LogResult<()> {
        let config = LogConfig::from_file(config_path)?;
        Self::init_with_config(config)
    }

    /// Initialize the logger with a LogConfig struct.
    ///
    /// An engine that is already running takes the new masks, retention and
    /// coloring. Its log directory moves only if nothing was written yet.
    pub fn init_with_config(config: LogConfig) -> LogResult<()> {
        let mut created = false;
        let engine = LOGGER_INSTANCE.get_or_init(|| {
            created = true;
            LogEngine::new(config.clone())
        });
        if !created {
            engine.reconfigure(config)?;
        }
        println!("Logger initialized, writing to '{}'", engine.paths().root().display());
        Ok(())
    }

    /// Install a fully built engine, e.g. one with a custom console
    pub fn install(engine: LogEngine) -> LogResult<()> {
        let root = engine.paths().root().to_path_buf();
        LOGGER_INSTANCE
            .set(engine)
            .map_err(|_| LogError::AlreadyInitialized)?;
        println!("Logger initialized, writing to '{}'", root.display());
        Ok(())
    }

    pub fn is_initialized() -> bool {
        LOGGER_INSTANCE.get().is_some()
    }

    /// The installed engine, installing the default one on first use
    pub fn engine() -> &'static LogEngine {
        LOGGER_INSTANCE.get_or_init(|| LogEngine::new(LogConfig::default()))
    }

    pub fn log(level: LogLevel, message: &str) {
        Self::engine().emit(level, message);
    }

    pub fn trace(message: &str) {
        Self::log(LogLevel::Trace, message)
    }

    pub fn info(message: &str) {
        Self::log(LogLevel::Info, message)
    }

    pub fn debug(message: &str) {
        Self::log(LogLevel::Debug, message)
    }

    pub fn warning(message: &str) {
        Self::log(LogLevel::Warning, message)
    }

    pub fn error(message: &str) {
        Self::log(LogLevel::Error, message)
    }

    pub fn fatal(message: &str) {
        Self::log(LogLevel::Fatal, message)
    }

    /// Levels printed to the console
    pub fn set_levels_to_display(levels: impl Into<LevelMask>) {
        Self::engine().set_display_levels(levels);
    }

    /// Levels saved into the session file
    pub fn set_levels_to_save(levels: impl Into<LevelMask>) {
        Self::engine().set_persist_levels(levels);
    }

    /// Number of archived sessions to keep in past_logs
    pub fn set_number_of_files_to_save(count: usize) {
        Self::engine().set_retention(count);
    }
}
