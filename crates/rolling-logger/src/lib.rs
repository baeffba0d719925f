//! Rolling File Logger
//!
//! Appends lines to `<dir>/<app>.log`, moving it to `<app>.1.log` once it
//! passes a byte limit. The most recent lines are also kept in memory for
//! diagnostics. `init_logger` installs a `tracing` subscriber writing
//! through the same file. `log` records are bridged in by the subscriber's
//! `tracing-log` feature, enabled in Cargo.toml.

use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

/// Roll over after this many bytes
pub const DEFAULT_MAX_BYTES: u64 = 2 * 1024 * 1024;
/// Lines kept in the in-memory buffer
pub const DEFAULT_BUFFER_LINES: usize = 500;

static LOGGER: OnceLock<Mutex<RollingFile>> = OnceLock::new();

pub struct RollingFile {
    path: PathBuf,
    rolled_path: PathBuf,
    file: File,
    written: u64,
    max_bytes: u64,
    recent: VecDeque<String>,
    capacity: usize,
}

impl RollingFile {
    pub fn open(dir: impl AsRef<Path>, app_name: &str, max_bytes: u64, capacity: usize) -> io::Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.log", app_name));
        let rolled_path = dir.join(format!("{}.1.log", app_name));
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let written = file.metadata()?.len();
        Ok(Self {
            path,
            rolled_path,
            file,
            written,
            max_bytes,
            recent: VecDeque::with_capacity(capacity),
            capacity,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one line (a trailing newline is added)
    pub fn append(&mut self, line: &str) -> io::Result<()> {
        let line = line.trim_end_matches('\n');
        let size = line.len() as u64 + 1;
        if self.written > 0 && self.written + size > self.max_bytes {
            self.roll()?;
        }
        writeln!(self.file, "{}", line)?;
        self.written += size;

        if self.capacity > 0 {
            if self.recent.len() == self.capacity {
                self.recent.pop_front();
            }
            self.recent.push_back(line.to_string());
        }
        Ok(())
    }

    fn roll(&mut self) -> io::Result<()> {
        self.file.flush()?;
        if self.rolled_path.exists() {
            fs::remove_file(&self.rolled_path)?;
        }
        fs::rename(&self.path, &self.rolled_path)?;
        self.file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        self.written = 0;
        Ok(())
    }

    /// Oldest first
    pub fn recent(&self) -> Vec<String> {
        self.recent.iter().cloned().collect()
    }
}

/// `io::Write` adapter handed to the tracing subscriber
struct GlobalWriter;

impl Write for GlobalWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text = String::from_utf8_lossy(buf);
        with_logger(|logger| {
            for line in text.lines() {
                logger.append(line)?;
            }
            Ok(())
        })?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        with_logger(|logger| logger.file.flush())
    }
}

fn with_logger<T>(f: impl FnOnce(&mut RollingFile) -> io::Result<T>) -> io::Result<T> {
    let logger = LOGGER
        .get()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "logger not initialized"))?;
    let mut guard = logger
        .lock()
        .map_err(|_| io::Error::new(io::ErrorKind::Other, "logger poisoned"))?;
    f(&mut guard)
}

/// Open the log file and install the global subscriber. Calling it again
/// keeps the first logger.
pub fn init_logger(dir: impl AsRef<Path>, app_name: &str) -> io::Result<PathBuf> {
    if let Some(existing) = LOGGER.get() {
        return existing
            .lock()
            .map(|logger| logger.path().to_path_buf())
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "logger poisoned"));
    }

    let file = RollingFile::open(dir, app_name, DEFAULT_MAX_BYTES, DEFAULT_BUFFER_LINES)?;
    let path = file.path().to_path_buf();
    let _ = LOGGER.set(Mutex::new(file));

    // Fails when the host already installed one; direct writes still work
    let _ = tracing_subscriber::fmt()
        .with_writer(|| GlobalWriter)
        .with_ansi(false)
        .with_max_level(tracing::Level::INFO)
        .try_init();

    info(&format!("{} logger started", app_name))?;
    Ok(path)
}

fn write_record(level: &str, message: &str) -> io::Result<()> {
    let line = format!(
        "{} {:5} {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
        level,
        message
    );
    with_logger(|logger| logger.append(&line))
}

pub fn info(message: &str) -> io::Result<()> {
    write_record("INFO", message)
}

pub fn warn(message: &str) -> io::Result<()> {
    write_record("WARN", message)
}

pub fn error(message: &str) -> io::Result<()> {
    write_record("ERROR", message)
}

/// Most recent lines, oldest first; empty before `init_logger`
pub fn recent_lines() -> Vec<String> {
    with_logger(|logger| Ok(logger.recent())).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = RollingFile::open(dir.path(), "test", 1024, 2).unwrap();
        file.append("one").unwrap();
        file.append("two\n").unwrap();
        file.append("three").unwrap();

        assert_eq!(file.recent(), vec!["two".to_string(), "three".to_string()]);
        let content = fs::read_to_string(file.path()).unwrap();
        assert_eq!(content, "one\ntwo\nthree\n");
    }

    #[test]
    fn test_rolls_over_at_limit() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = RollingFile::open(dir.path(), "roll", 10, 8).unwrap();
        file.append("aaaaaaa").unwrap();
        file.append("bbbbbbb").unwrap();

        let rolled = fs::read_to_string(dir.path().join("roll.1.log")).unwrap();
        let current = fs::read_to_string(dir.path().join("roll.log")).unwrap();
        assert_eq!(rolled, "aaaaaaa\n");
        assert_eq!(current, "bbbbbbb\n");

        // A second roll replaces the previous backup
        file.append("ccccccc").unwrap();
        let rolled = fs::read_to_string(dir.path().join("roll.1.log")).unwrap();
        assert_eq!(rolled, "bbbbbbb\n");
    }

    #[test]
    fn test_reopen_continues_size() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut file = RollingFile::open(dir.path(), "again", 1024, 4).unwrap();
            file.append("first").unwrap();
        }
        let mut file = RollingFile::open(dir.path(), "again", 1024, 4).unwrap();
        file.append("second").unwrap();
        let content = fs::read_to_string(file.path()).unwrap();
        assert_eq!(content, "first\nsecond\n");
    }

    #[test]
    fn test_global_logger() {
        let dir = tempfile::tempdir().unwrap();
        let path = init_logger(dir.path(), "global").unwrap();
        warn("disk almost full").unwrap();
        error("write failed").unwrap();
        log::info!(target: "ranking_store::repository", "replaced placements of r1");
        log::debug!("below the max level");

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("global logger started"));
        assert!(content.contains("WARN  disk almost full"));
        assert!(content.contains("ERROR write failed"));
        assert!(content
            .lines()
            .any(|line| line.contains("ranking_store::repository") && line.contains("replaced placements of r1")));
        assert!(!content.contains("below the max level"));
        assert!(recent_lines().iter().any(|line| line.ends_with("write failed")));
    }
}
