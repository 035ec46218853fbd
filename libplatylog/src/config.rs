/*
 * Configuration management for the logger
 *
 * This module handles:
 * - Parsing configuration from TOML files (app_config.toml)
 * - Reading the [logging] section, or a bare top-level table for older files
 * - Providing default values for every setting
 *
 * The configuration determines:
 * - Which levels are printed to the console and which are saved to file
 * - How many archived session files are kept
 * - Where the log directory lives and whether console output is colored
 */

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{LogError, LogResult};
use crate::level::LevelMask;
use crate::store::{DEFAULT_LOG_DIR, DEFAULT_RETENTION};

pub const DEFAULT_CONFIG_FILE: &str = "app_config.toml";

/// Configuration for the logger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Levels printed to the console
    #[serde(default = "default_levels")]
    pub display_levels: LevelMask,

    /// Levels appended to the session file
    #[serde(default = "default_levels")]
    pub persist_levels: LevelMask,

    /// Number of archived session files to keep
    #[serde(default = "default_retention")]
    pub retention: usize,

    /// Root of the log directory
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    /// Color console output by level (ignored when stdout is not a terminal)
    #[serde(default = "default_colored")]
    pub colored: bool,
}

fn default_levels() -> LevelMask {
    LevelMask::ALL
}

fn default_retention() -> usize {
    DEFAULT_RETENTION
}

fn default_log_dir() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_DIR)
}

fn default_colored() -> bool {
    true
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            display_levels: default_levels(),
            persist_levels: default_levels(),
            retention: default_retention(),
            log_dir: default_log_dir(),
            colored: default_colored(),
        }
    }
}

impl LogConfig {
    /// Create configuration from a TOML file. A missing file yields the defaults.
    pub fn from_file(file_path: impl AsRef<Path>) -> LogResult<Self> {
        let file_path = file_path.as_ref();
        let config_str = match fs::read_to_string(file_path) {
            Ok(content) => content,
            Err(e) => {
                println!(
                    "Warning: Could not read config file '{}': {}. Using defaults.",
                    file_path.display(),
                    e
                );
                return Ok(LogConfig::default());
            }
        };

        Self::from_toml_str(&config_str)
    }

    /// Parse configuration from TOML text, preferring a [logging] section.
    pub fn from_toml_str(config_str: &str) -> LogResult<Self> {
        let mut table: toml::Table = toml::from_str(config_str)
            .map_err(|e| LogError::Config(format!("Failed to parse config file: {}", e)))?;

        let section = match table.remove("logging") {
            Some(logging) => logging,
            None => toml::Value::Table(table),
        };

        section
            .try_into::<LogConfig>()
            .map_err(|e| LogError::Config(format!("Invalid [logging] settings: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::LogLevel;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = LogConfig::default();
        assert_eq!(config.display_levels, LevelMask::ALL);
        assert_eq!(config.persist_levels, LevelMask::ALL);
        assert_eq!(config.retention, 5);
        assert_eq!(config.log_dir, PathBuf::from("./logs"));
        assert!(config.colored);
    }

    #[test]
    fn test_logging_section() {
        let config = LogConfig::from_toml_str(
            r#"
            [engine]
            port = 8080

            [logging]
            display_levels = ["warning", "Error", "FATAL"]
            persist_levels = "all"
            retention = 10
            log_dir = "/var/log/app"
            colored = false
            "#,
        )
        .unwrap();

        assert_eq!(
            config.display_levels,
            LevelMask::WARNING | LevelMask::ERROR | LevelMask::FATAL
        );
        assert!(!config.display_levels.contains(LogLevel::Info));
        assert_eq!(config.persist_levels, LevelMask::ALL);
        assert_eq!(config.retention, 10);
        assert_eq!(config.log_dir, PathBuf::from("/var/log/app"));
        assert!(!config.colored);
    }

    #[test]
    fn test_bare_table_and_numeric_mask() {
        let config = LogConfig::from_toml_str("persist_levels = 24\ndisplay_levels = \"none\"").unwrap();
        assert_eq!(config.persist_levels, LevelMask::WARNING | LevelMask::ERROR);
        assert_eq!(config.display_levels, LevelMask::NONE);
        assert_eq!(config.retention, 5);
    }

    #[test]
    fn test_unknown_level_name_is_rejected() {
        let err = LogConfig::from_toml_str("[logging]\ndisplay_levels = [\"verbose\"]").unwrap_err();
        assert!(matches!(err, LogError::Config(_)));
    }

    #[test]
    fn test_malformed_toml_is_rejected() {
        assert!(LogConfig::from_toml_str("[logging\nretention = ").is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = LogConfig::from_file(temp_dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, LogConfig::default());
    }

    #[test]
    fn test_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, "[logging]\nretention = 2\n").unwrap();
        assert_eq!(LogConfig::from_file(&path).unwrap().retention, 2);
    }
}
