//! Shared harness: a temporary log directory with controllable mtimes.

#![allow(dead_code)]

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use chrono::{DateTime, TimeDelta, Utc};
use tempfile::TempDir;

use wl_log_miner::{FileLogSource, LogMiner, MinerConfig};

/// A throwaway log directory.
pub struct LogDir {
    dir: TempDir,
}

impl LogDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `lines` to `name` (newline-terminated), mtime now.
    pub fn write(&self, name: &str, lines: &[String]) -> PathBuf {
        let path = self.path().join(name);
        let mut out = BufWriter::new(File::create(&path).unwrap());
        for line in lines {
            writeln!(out, "{line}").unwrap();
        }
        out.flush().unwrap();
        path
    }

    /// Write `lines` and backdate the file's mtime by `age`.
    pub fn write_aged(&self, name: &str, lines: &[String], age: Duration) -> PathBuf {
        let path = self.write(name, lines);
        self.set_age(name, age);
        path
    }

    pub fn set_age(&self, name: &str, age: Duration) {
        File::options()
            .write(true)
            .open(self.path().join(name))
            .unwrap()
            .set_modified(SystemTime::now() - age)
            .unwrap();
    }

    /// Append raw bytes to `name`, creating it if needed.
    pub fn append(&self, name: &str, bytes: &[u8]) {
        let mut file = File::options()
            .create(true)
            .append(true)
            .open(self.path().join(name))
            .unwrap();
        file.write_all(bytes).unwrap();
    }

    pub fn file_size(&self, name: &str) -> u64 {
        fs::metadata(self.path().join(name)).unwrap().len()
    }

    pub fn miner(&self) -> LogMiner<FileLogSource> {
        self.miner_with(MinerConfig::default())
    }

    pub fn miner_with(&self, config: MinerConfig) -> LogMiner<FileLogSource> {
        LogMiner::for_directory(self.path(), config).unwrap()
    }
}

/// One structured line dated `at`, with an offset-less date.
pub fn line(at: DateTime<Utc>, channel: &str, level: &str, message: &str) -> String {
    format!(
        "[{}] {channel}.{level}: {message}",
        at.format("%Y-%m-%d %H:%M:%S")
    )
}

pub fn ago(delta: TimeDelta) -> DateTime<Utc> {
    Utc::now() - delta
}

pub fn days(n: u64) -> Duration {
    Duration::from_secs(n * 86_400)
}
