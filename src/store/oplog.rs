//! Optional log of store operations. When a log path is configured
//! every operation appends a timestamped line to the file, otherwise
//! records are dropped by `NoopLog`.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Local;

use super::error::Result;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

pub trait OpLog: Send + Sync {
    /// Record a single operation line, e.g. `op = "INSERT"`.
    fn record(&self, op: &str, message: &str);
}

pub struct NoopLog;

impl OpLog for NoopLog {
    fn record(&self, _op: &str, _message: &str) {}
}

pub struct FileLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileLog {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

pub fn format_line(op: &str, message: &str) -> String {
    format!(
        "{} -- [MONGODB {}] {}",
        Local::now().format(TIMESTAMP_FORMAT),
        op,
        message
    )
}

impl OpLog for FileLog {
    fn record(&self, op: &str, message: &str) {
        tracing::debug!("[MONGODB {}] {}", op, message);
        let line = format_line(op, message);
        let mut file = match self.file.lock() {
            Ok(file) => file,
            Err(poisoned) => poisoned.into_inner(),
        };
        // A failed log write should never fail the store operation
        if let Err(e) = writeln!(file, "{}", line) {
            tracing::error!("Failed to write to {}: {}", self.path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_formats_lines_with_timestamp_and_op() {
        let line = format_line("INSERT", "Insertion complete...");
        assert!(line.ends_with(" -- [MONGODB INSERT] Insertion complete..."));
        // Timestamp is first, e.g. 2026-10-19 12:00:00.000000
        assert!(line.chars().next().unwrap().is_ascii_digit());
    }

    #[test]
    fn it_appends_lines_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("mongodb.log");

        let log = FileLog::open(&path).unwrap();
        log.record("STARTING", "Connecting to DB...");
        log.record("DELETE", "Completed deletion...");

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("-- [MONGODB STARTING] Connecting to DB..."));
        assert!(lines[1].contains("-- [MONGODB DELETE] Completed deletion..."));
    }

    #[test]
    fn it_keeps_existing_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mongodb.log");
        fs::write(&path, "earlier line\n").unwrap();

        let log = FileLog::open(&path).unwrap();
        log.record("INSERT", "Inserting payload...");

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("earlier line\n"));
        assert!(contents.contains("[MONGODB INSERT] Inserting payload..."));
    }
}
