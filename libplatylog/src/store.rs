/*
 * On-disk session file and archive rotation
 *
 * Layout under the log root (default ./logs):
 * - latest_log.txt   the session file of the running process
 * - past_logs/       archived session files, log_<stamp>.txt
 *
 * The first write of a process archives the previous session file (if any),
 * evicting the oldest archive when the retention limit is reached, then
 * truncates the session file and writes the creation banner. Every later
 * write is its own open/append/close cycle, so nothing is buffered between
 * records.
 */

use chrono::NaiveDateTime;
use std::cmp::Ordering;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::clock::calendar_stamp;
use crate::error::{LogError, LogResult};

pub const DEFAULT_LOG_DIR: &str = "./logs";
pub const SESSION_FILE_NAME: &str = "latest_log.txt";
pub const ARCHIVE_DIR_NAME: &str = "past_logs";
pub const DEFAULT_RETENTION: usize = 5;

/// Label in front of the banner timestamp. Archive names are derived by
/// dropping exactly this many characters from the banner line, so the banner
/// writer and the name derivation must both use this constant.
pub const BANNER_LABEL: &str = "Created - ";

/// Paths of the log root, the session file and the archive directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogPaths {
    root: PathBuf,
    session: PathBuf,
    archive: PathBuf,
}

impl LogPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        LogPaths {
            session: root.join(SESSION_FILE_NAME),
            archive: root.join(ARCHIVE_DIR_NAME),
            root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn session_file(&self) -> &Path {
        &self.session
    }

    pub fn archive_dir(&self) -> &Path {
        &self.archive
    }
}

impl Default for LogPaths {
    fn default() -> Self {
        LogPaths::new(DEFAULT_LOG_DIR)
    }
}

/// What the session rotation did, reported back so the engine can announce evictions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RotationReport {
    pub archived: Option<PathBuf>,
    pub evicted: Option<PathBuf>,
}

/// `Created - Y. M. D. H:M:S`
pub fn banner_line(at: &NaiveDateTime) -> String {
    format!("{}{}", BANNER_LABEL, calendar_stamp(at))
}

/// Derives `log_<stamp>.txt` from a banner line: drop the label, drop all
/// whitespace, turn colons into hyphens.
pub fn archive_name_from_banner(banner: &str) -> String {
    let stamp: String = banner
        .chars()
        .skip(BANNER_LABEL.chars().count())
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ':' { '-' } else { c })
        .collect();
    format!("log_{}.txt", stamp)
}

/// Owns the session file and the archive directory.
#[derive(Debug)]
pub struct FileStore {
    paths: LogPaths,
    retention: usize,
    rotate_pending: bool,
}

impl FileStore {
    pub fn new(paths: LogPaths, retention: usize) -> Self {
        FileStore {
            paths,
            retention,
            rotate_pending: true,
        }
    }

    pub fn paths(&self) -> &LogPaths {
        &self.paths
    }

    pub fn retention(&self) -> usize {
        self.retention
    }

    pub fn set_retention(&mut self, retention: usize) {
        self.retention = retention;
    }

    /// True until the first write of this process has started a fresh session.
    pub fn rotation_pending(&self) -> bool {
        self.rotate_pending
    }

    /// Appends one record line to the session file, rotating first if this is
    /// the first write of the process.
    ///
    /// An error means the session file could not be opened or written.
    pub fn persist(&mut self, line: &str, now: &NaiveDateTime) -> LogResult<RotationReport> {
        self.ensure_directories()?;

        let session = self.paths.session.clone();
        let mut report = RotationReport::default();

        let mut file = if self.rotate_pending {
            if session.exists() {
                report = self.archive_previous_session(now);
            }
            self.rotate_pending = false;

            let mut file = File::create(&session).map_err(|e| LogError::io(&session, e))?;
            write!(file, "{}\n\n", banner_line(now)).map_err(|e| LogError::io(&session, e))?;
            file
        } else {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&session)
                .map_err(|e| LogError::io(&session, e))?
        };

        writeln!(file, "{}", line).map_err(|e| LogError::io(&session, e))?;
        Ok(report)
    }

    fn ensure_directories(&self) -> LogResult<()> {
        if self.paths.root.exists() && self.paths.archive.exists() {
            return Ok(());
        }
        fs::create_dir_all(&self.paths.archive).map_err(|e| LogError::io(&self.paths.archive, e))
    }

    /// Copies the previous session file into the archive directory.
    ///
    /// The archive is named from the file's banner line. If that line cannot
    /// be read, the name comes from `now`, the rotation time, and so reflects
    /// when the old session was archived rather than when it began.
    ///
    /// Every failure in here is absorbed: the new session starts regardless.
    fn archive_previous_session(&self, now: &NaiveDateTime) -> RotationReport {
        let mut report = RotationReport::default();
        let archive = &self.paths.archive;
        let _ = fs::create_dir_all(archive);

        // At most one eviction per rotation, even if already over the limit
        if count_regular_files(archive) >= self.retention {
            if let Some(oldest) = oldest_file(archive) {
                if fs::remove_file(&oldest).is_ok() {
                    report.evicted = Some(oldest);
                }
            }
        }

        let name = match read_first_line(&self.paths.session) {
            Ok(banner) => archive_name_from_banner(&banner),
            Err(_) => archive_name_from_banner(&banner_line(now)),
        };

        let target = archive.join(name);
        if fs::copy(&self.paths.session, &target).is_ok() {
            report.archived = Some(target);
        }

        report
    }
}

fn read_first_line(path: &Path) -> std::io::Result<String> {
    let file = File::open(path)?;
    match BufReader::new(file).lines().next() {
        Some(line) => line,
        None => Ok(String::new()),
    }
}

fn count_regular_files(dir: &Path) -> usize {
    match fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .count(),
        Err(_) => 0,
    }
}

/// Regular file with the earliest creation time. Files whose creation time
/// cannot be read count as older than any file whose time can; ties are
/// broken by file name.
fn oldest_file(dir: &Path) -> Option<PathBuf> {
    let entries = fs::read_dir(dir).ok()?;
    entries
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|entry| {
            let created: Option<SystemTime> = entry.metadata().and_then(|m| m.created()).ok();
            (created, entry.path())
        })
        .min_by(|a, b| compare_age(a, b))
        .map(|(_, path)| path)
}

fn compare_age(a: &(Option<SystemTime>, PathBuf), b: &(Option<SystemTime>, PathBuf)) -> Ordering {
    // Option orders None before Some, which puts unknown creation times first
    a.0.cmp(&b.0).then_with(|| a.1.file_name().cmp(&b.1.file_name()))
}
