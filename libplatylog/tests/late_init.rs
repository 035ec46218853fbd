// Setters called before init create the default engine; init must still apply
// its config. Separate binary because the facade is process-wide.

use platylog::{LevelMask, LogConfig, Logger};
use tempfile::TempDir;

#[test]
fn test_setter_before_init_does_not_discard_config() {
    Logger::set_levels_to_display(LevelMask::ERROR);
    assert!(Logger::is_initialized());

    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("logs");
    let config = LogConfig {
        display_levels: LevelMask::WARNING | LevelMask::ERROR,
        persist_levels: LevelMask::INFO,
        retention: 2,
        log_dir: root.clone(),
        colored: false,
    };

    Logger::init_with_config(config).unwrap();

    let engine = Logger::engine();
    assert_eq!(engine.paths().root(), root.as_path());
    assert_eq!(engine.retention(), 2);
    assert_eq!(engine.display_levels(), LevelMask::WARNING | LevelMask::ERROR);
    assert_eq!(engine.persist_levels(), LevelMask::INFO);

    Logger::info("written under the configured directory");
    let session = std::fs::read_to_string(root.join("latest_log.txt")).unwrap();
    assert!(session.ends_with("<Info> - written under the configured directory\n"));
}
