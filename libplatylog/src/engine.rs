/*
 * Logging engine
 *
 * LogEngine is the context object every leveled call goes through. It owns:
 * - the level registry (display and persist masks)
 * - the console the records are printed to
 * - the file store holding the session file and archives
 * - the clock used for headers and banners
 *
 * All of it sits behind one Mutex. A record is built, printed and persisted
 * while the lock is held, so concurrent callers never interleave and the file
 * order matches the console order. The price is that a slow disk stalls every
 * logging thread for the duration of the write.
 */

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDateTime;

use crate::clock::{time_of_day, Clock, SystemClock};
use crate::config::LogConfig;
use crate::console::{console_for, Console};
use crate::error::{LogError, LogResult};
use crate::level::{LevelMask, LevelRegistry, LogLevel};
use crate::store::{FileStore, LogPaths, RotationReport};

/// `[H:M:S] <Level>`
pub fn format_header(at: &NaiveDateTime, level: LogLevel) -> String {
    format!("[{}] <{}>", time_of_day(at), level)
}

struct EngineState {
    registry: LevelRegistry,
    console: Box<dyn Console>,
    colored: bool,
    store: FileStore,
    clock: Box<dyn Clock>,
}

impl EngineState {
    fn emit(&mut self, level: LogLevel, message: &str) {
        let now = self.clock.now();
        let line = format!("{} - {}", format_header(&now, level), message);

        if self.registry.is_displayed(level) {
            self.console.apply(level);
            self.console.print_line(&line);
        }

        if self.registry.is_persisted(level) {
            match self.store.persist(&line, &now) {
                Ok(report) => self.announce(&report),
                // The session file is unusable; stop trying for the rest of the process
                Err(_) => self.registry.set_persist_levels(LevelMask::NONE),
            }
        }
    }

    // Shown in the Error style, so it follows the Error display bit
    fn announce(&mut self, report: &RotationReport) {
        if !self.registry.is_displayed(LogLevel::Error) {
            return;
        }
        if let Some(evicted) = &report.evicted {
            self.console.apply(LogLevel::Error);
            self.console.print_line(&format!(
                "Maximum number of past logs reached, removing: {}",
                evicted.display()
            ));
        }
    }
}

/// Process logging context. Share it by reference (or `Arc`) across threads.
pub struct LogEngine {
    state: Mutex<EngineState>,
}

impl LogEngine {
    /// Engine with the system clock and the console selected by `config.colored`
    pub fn new(config: LogConfig) -> Self {
        let console = console_for(config.colored);
        Self::with_parts(config, console, Box::new(SystemClock))
    }

    pub fn with_parts(config: LogConfig, console: Box<dyn Console>, clock: Box<dyn Clock>) -> Self {
        let state = EngineState {
            registry: LevelRegistry::new(config.display_levels, config.persist_levels),
            console,
            colored: config.colored,
            store: FileStore::new(LogPaths::new(config.log_dir), config.retention),
            clock,
        };
        LogEngine {
            state: Mutex::new(state),
        }
    }

    /// Applies a new configuration to a running engine.
    ///
    /// Masks, retention and console coloring always take effect. The log
    /// directory can only move before the first record is written; after
    /// that a different `log_dir` is refused with `LogError::SessionActive`
    /// and the current session file stays in place.
    pub fn reconfigure(&self, config: LogConfig) -> LogResult<()> {
        let mut state = self.lock();
        state.registry = LevelRegistry::new(config.display_levels, config.persist_levels);
        if state.colored != config.colored {
            state.console = console_for(config.colored);
            state.colored = config.colored;
        }

        let paths = LogPaths::new(config.log_dir);
        if paths == *state.store.paths() {
            state.store.set_retention(config.retention);
            return Ok(());
        }
        if !state.store.rotation_pending() {
            state.store.set_retention(config.retention);
            return Err(LogError::SessionActive(
                state.store.paths().session_file().to_path_buf(),
            ));
        }
        state.store = FileStore::new(paths, config.retention);
        Ok(())
    }

    // A panic while logging must not silence every other thread
    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Emits one record. Never fails and never panics on I/O problems.
    pub fn emit(&self, level: LogLevel, message: &str) {
        self.lock().emit(level, message);
    }

    pub fn trace(&self, message: &str) {
        self.emit(LogLevel::Trace, message);
    }

    pub fn info(&self, message: &str) {
        self.emit(LogLevel::Info, message);
    }

    pub fn debug(&self, message: &str) {
        self.emit(LogLevel::Debug, message);
    }

    pub fn warning(&self, message: &str) {
        self.emit(LogLevel::Warning, message);
    }

    pub fn error(&self, message: &str) {
        self.emit(LogLevel::Error, message);
    }

    pub fn fatal(&self, message: &str) {
        self.emit(LogLevel::Fatal, message);
    }

    pub fn set_display_levels(&self, mask: impl Into<LevelMask>) {
        self.lock().registry.set_display_levels(mask.into());
    }

    pub fn set_persist_levels(&self, mask: impl Into<LevelMask>) {
        self.lock().registry.set_persist_levels(mask.into());
    }

    /// Takes effect at the next rotation, i.e. the next process start if this
    /// process has already written its first record.
    pub fn set_retention(&self, retention: usize) {
        self.lock().store.set_retention(retention);
    }

    pub fn display_levels(&self) -> LevelMask {
        self.lock().registry.display_levels()
    }

    pub fn persist_levels(&self) -> LevelMask {
        self.lock().registry.persist_levels()
    }

    pub fn retention(&self) -> usize {
        self.lock().store.retention()
    }

    pub fn paths(&self) -> LogPaths {
        self.lock().store.paths().clone()
    }

    pub fn session_path(&self) -> PathBuf {
        self.paths().session_file().to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::console::MemoryConsole;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_engine(config: LogConfig) -> (LogEngine, MemoryConsole, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config = LogConfig {
            log_dir: temp_dir.path().join("logs"),
            ..config
        };
        let console = MemoryConsole::new();
        let clock = FixedClock::at(2024, 1, 5, 9, 5, 7).unwrap();
        let engine = LogEngine::with_parts(config, Box::new(console.clone()), Box::new(clock));
        (engine, console, temp_dir)
    }

    #[test]
    fn test_header_format() {
        let at = FixedClock::at(2024, 1, 5, 9, 5, 7).unwrap().now();
        assert_eq!(format_header(&at, LogLevel::Warning), "[9:5:7] <Warning>");
    }

    #[test]
    fn test_emit_prints_styled_line() {
        let (engine, console, _temp) = create_test_engine(LogConfig::default());
        engine.warning("disk at 91%");

        let captured = console.captured();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].style, Some(LogLevel::Warning));
        assert_eq!(captured[0].text, "[9:5:7] <Warning> - disk at 91%");
    }

    #[test]
    fn test_hidden_level_is_still_persisted() {
        let (engine, console, _temp) = create_test_engine(LogConfig::default());
        engine.set_display_levels(LevelMask::ERROR);
        engine.info("quiet");

        assert!(console.lines().is_empty());
        let content = fs::read_to_string(engine.session_path()).unwrap();
        assert!(content.ends_with("[9:5:7] <Info> - quiet\n"));
    }

    #[test]
    fn test_nothing_touches_disk_when_persist_is_none() {
        let (engine, console, _temp) = create_test_engine(LogConfig {
            persist_levels: LevelMask::NONE,
            ..LogConfig::default()
        });
        engine.fatal("console only");

        assert_eq!(console.lines().len(), 1);
        assert!(!engine.paths().root().exists());
    }

    #[test]
    fn test_write_failure_disables_persistence() {
        let (engine, console, _temp) = create_test_engine(LogConfig::default());
        fs::create_dir_all(engine.session_path()).unwrap();

        engine.error("first");
        assert_eq!(engine.persist_levels(), LevelMask::NONE);
        engine.error("second");

        assert_eq!(console.lines().len(), 2);
    }

    #[test]
    fn test_retention_setter() {
        let (engine, _console, _temp) = create_test_engine(LogConfig::default());
        assert_eq!(engine.retention(), 5);
        engine.set_retention(2);
        assert_eq!(engine.retention(), 2);
    }

    #[test]
    fn test_reconfigure_before_first_write_moves_directory() {
        let (engine, _console, temp) = create_test_engine(LogConfig::default());
        engine.set_display_levels(LevelMask::ERROR);
        let moved = temp.path().join("moved");

        let result = engine.reconfigure(LogConfig {
            display_levels: LevelMask::WARNING | LevelMask::FATAL,
            retention: 2,
            log_dir: moved.clone(),
            ..LogConfig::default()
        });

        assert!(result.is_ok());
        assert_eq!(engine.display_levels(), LevelMask::WARNING | LevelMask::FATAL);
        assert_eq!(engine.retention(), 2);
        assert_eq!(engine.paths().root(), moved.as_path());

        engine.info("after move");
        assert!(moved.join("latest_log.txt").is_file());
        assert!(!temp.path().join("logs").exists());
    }

    #[test]
    fn test_reconfigure_after_first_write_keeps_directory() {
        let (engine, _console, temp) = create_test_engine(LogConfig::default());
        engine.info("first");
        let session = engine.session_path();

        let result = engine.reconfigure(LogConfig {
            persist_levels: LevelMask::FATAL,
            retention: 3,
            log_dir: temp.path().join("elsewhere"),
            ..LogConfig::default()
        });

        assert!(matches!(result, Err(LogError::SessionActive(ref path)) if *path == session));
        assert_eq!(engine.persist_levels(), LevelMask::FATAL);
        assert_eq!(engine.retention(), 3);
        assert_eq!(engine.session_path(), session);
        assert!(!temp.path().join("elsewhere").exists());
    }

    #[test]
    fn test_reconfigure_same_directory_after_first_write() {
        let (engine, _console, temp) = create_test_engine(LogConfig::default());
        engine.info("first");

        let result = engine.reconfigure(LogConfig {
            retention: 1,
            log_dir: temp.path().join("logs"),
            ..LogConfig::default()
        });

        assert!(result.is_ok());
        assert_eq!(engine.retention(), 1);
        engine.info("second");
        let content = fs::read_to_string(engine.session_path()).unwrap();
        assert!(content.contains("<Info> - first\n"));
        assert!(content.ends_with("<Info> - second\n"));
    }
}
