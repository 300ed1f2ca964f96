//! Bounded reads of large log files.
//!
//! Files up to the full-read ceiling are read from the start. Anything
//! larger is read from `size - tail_window` onwards, dropping the first
//! (partial) line. Entries before that horizon are invisible to the scan.

use std::io::SeekFrom;
use tokio::io::{
    AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncSeek, AsyncSeekExt, BufReader, Take,
};

use crate::error::{LogError, LogResult};

pub const DEFAULT_FULL_READ_CEILING: u64 = 50 * 1024 * 1024;
pub const DEFAULT_TAIL_WINDOW: u64 = 5 * 1024 * 1024;

/// Byte thresholds for one file read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TailLimits {
    pub full_read_ceiling: u64,
    pub tail_window: u64,
}

impl Default for TailLimits {
    fn default() -> Self {
        Self {
            full_read_ceiling: DEFAULT_FULL_READ_CEILING,
            tail_window: DEFAULT_TAIL_WINDOW,
        }
    }
}

/// Where reading starts for a file of a given size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TailPlan {
    Full,
    Tail { offset: u64 },
}

impl TailLimits {
    pub fn plan(&self, size: u64) -> TailPlan {
        if size <= self.full_read_ceiling {
            TailPlan::Full
        } else {
            TailPlan::Tail {
                offset: size.saturating_sub(self.tail_window),
            }
        }
    }
}

/// Line reader over the planned window of one file.
///
/// Reads never go past the size the file had when it was opened, so a file
/// that keeps growing during the scan cannot stretch the bound.
pub struct TailReader<R> {
    inner: BufReader<Take<R>>,
    name: String,
    buf: Vec<u8>,
}

impl<R: AsyncRead + AsyncSeek + Unpin> TailReader<R> {
    pub async fn open(
        mut reader: R,
        name: impl Into<String>,
        size: u64,
        limits: &TailLimits,
    ) -> LogResult<Self> {
        let name = name.into();
        let plan = limits.plan(size);
        let start = match plan {
            TailPlan::Full => 0,
            TailPlan::Tail { offset } => {
                reader
                    .seek(SeekFrom::Start(offset))
                    .await
                    .map_err(|e| LogError::io(&name, e))?;
                tracing::debug!(file = %name, size_bytes = size, offset, "reading tail window");
                offset
            }
        };

        let mut tail = Self {
            inner: BufReader::new(reader.take(size - start)),
            name,
            buf: Vec::new(),
        };
        if matches!(plan, TailPlan::Tail { .. }) {
            // The seek point almost never lands on a line boundary.
            tail.next_line().await?;
        }
        Ok(tail)
    }

    /// Next line with its terminator stripped, or `None` at the end of the window.
    ///
    /// Invalid UTF-8 is replaced rather than rejected.
    pub async fn next_line(&mut self) -> LogResult<Option<String>> {
        self.buf.clear();
        let n = self
            .inner
            .read_until(b'\n', &mut self.buf)
            .await
            .map_err(|e| LogError::io(&self.name, e))?;
        if n == 0 {
            return Ok(None);
        }

        let mut line = self.buf.as_slice();
        if let Some(rest) = line.strip_suffix(b"\n") {
            line = rest;
        }
        if let Some(rest) = line.strip_suffix(b"\r") {
            line = rest;
        }
        Ok(Some(String::from_utf8_lossy(line).into_owned()))
    }

    /// Drain the rest of the window into memory.
    pub async fn read_all(mut self) -> LogResult<Vec<String>> {
        let mut lines = Vec::new();
        while let Some(line) = self.next_line().await? {
            lines.push(line);
        }
        Ok(lines)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
