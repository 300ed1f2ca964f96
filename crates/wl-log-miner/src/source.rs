//! Log source abstraction: list and open log files from disk or from memory.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use tokio::io::{AsyncRead, AsyncSeek};

use crate::catalog;
use crate::error::{LogError, LogResult};
use crate::types::LogFileDescriptor;

/// Seekable byte stream over one log file.
pub trait LogReader: AsyncRead + AsyncSeek + Send {}

impl<T: AsyncRead + AsyncSeek + Send> LogReader for T {}

/// An opened log file and its size at open time.
pub struct OpenedLog {
    pub reader: Pin<Box<dyn LogReader>>,
    pub size: u64,
}

/// Where a scan gets its files from.
///
/// Enables mocking for tests; `FileLogSource` is the real backend.
#[async_trait]
pub trait LogSource: Send + Sync {
    /// Candidate log files, newest first.
    async fn list_files(&self) -> LogResult<Vec<LogFileDescriptor>>;

    /// Open one of the files returned by `list_files`.
    async fn open(&self, name: &str) -> LogResult<OpenedLog>;
}

/// Reads `*.log` files from one directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileLogSource {
    dir: PathBuf,
}

impl FileLogSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl LogSource for FileLogSource {
    async fn list_files(&self) -> LogResult<Vec<LogFileDescriptor>> {
        catalog::scan_directory(&self.dir).await
    }

    async fn open(&self, name: &str) -> LogResult<OpenedLog> {
        let path = self.dir.join(name);
        let file = tokio::fs::File::open(&path)
            .await
            .map_err(|e| LogError::io(path.display(), e))?;
        let size = file
            .metadata()
            .await
            .map_err(|e| LogError::io(path.display(), e))?
            .len();
        Ok(OpenedLog {
            reader: Box::pin(file),
            size,
        })
    }
}
