//! In-memory log source for tests: files with fixed content and mtimes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::io::Cursor;

use crate::catalog;
use crate::error::{LogError, LogResult};
use crate::source::{LogSource, OpenedLog};
use crate::types::LogFileDescriptor;

struct MockFile {
    content: Vec<u8>,
    modified_at: DateTime<Utc>,
    readable: bool,
}

/// A mock log source that serves pre-loaded content by file name.
///
/// Listing applies the same name filter and ordering as the filesystem
/// catalog.
#[derive(Default)]
pub struct MockLogSource {
    files: HashMap<String, MockFile>,
    list_error: bool,
}

impl MockLogSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// A source whose directory cannot be listed.
    pub fn missing_directory() -> Self {
        Self {
            list_error: true,
            ..Self::default()
        }
    }

    /// Add a file made of `lines`, each terminated with `\n`.
    pub fn add_file(
        &mut self,
        name: impl Into<String>,
        lines: Vec<String>,
        modified_at: DateTime<Utc>,
    ) {
        let mut content = Vec::new();
        for line in lines {
            content.extend_from_slice(line.as_bytes());
            content.push(b'\n');
        }
        self.add_raw(name, content, modified_at);
    }

    /// Add a file with exact byte content.
    pub fn add_raw(&mut self, name: impl Into<String>, content: Vec<u8>, modified_at: DateTime<Utc>) {
        self.files.insert(
            name.into(),
            MockFile {
                content,
                modified_at,
                readable: true,
            },
        );
    }

    /// Add a file that is listed but fails to open.
    pub fn add_unreadable(&mut self, name: impl Into<String>, size: usize, modified_at: DateTime<Utc>) {
        self.files.insert(
            name.into(),
            MockFile {
                content: vec![b'x'; size],
                modified_at,
                readable: false,
            },
        );
    }
}

#[async_trait]
impl LogSource for MockLogSource {
    async fn list_files(&self) -> LogResult<Vec<LogFileDescriptor>> {
        if self.list_error {
            return Err(LogError::NotFound("mock directory".into()));
        }
        let mut files: Vec<_> = self
            .files
            .iter()
            .filter(|(name, _)| catalog::is_candidate(name))
            .map(|(name, f)| LogFileDescriptor::new(name, f.content.len() as u64, f.modified_at))
            .collect();
        catalog::sort_newest_first(&mut files);
        Ok(files)
    }

    async fn open(&self, name: &str) -> LogResult<OpenedLog> {
        let file = self
            .files
            .get(name)
            .ok_or_else(|| LogError::NotFound(name.to_string()))?;
        if !file.readable {
            return Err(LogError::Io(format!("{name}: permission denied")));
        }
        Ok(OpenedLog {
            reader: Box::pin(Cursor::new(file.content.clone())),
            size: file.content.len() as u64,
        })
    }
}
