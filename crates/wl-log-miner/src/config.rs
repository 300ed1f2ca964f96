//! Scan thresholds. Defaults match the behaviour the HTTP consumers expect.

use chrono::TimeDelta;
use serde::Deserialize;
use std::time::Duration;

use crate::error::{LogError, LogResult};
use crate::tail::{DEFAULT_FULL_READ_CEILING, DEFAULT_TAIL_WINDOW, TailLimits};

/// Thresholds for one scan. Every field has a default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MinerConfig {
    /// Files up to this size are read in full.
    pub full_read_ceiling_bytes: u64,
    /// Bytes read from the end of larger files.
    pub tail_window_bytes: u64,
    /// Cap on the recent-error list, across all files.
    pub max_recent_errors: usize,
    /// Recent-error messages are cut to this many characters.
    pub max_message_chars: usize,
    /// Stats window; also the mtime cutoff for stats eligibility.
    pub stats_window_hours: u64,
    /// Short window: 24h counters and the recent-error age cutoff.
    pub recent_window_hours: u64,
    /// Stop opening new files once a scan has run this long.
    pub scan_deadline_ms: Option<u64>,
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            full_read_ceiling_bytes: DEFAULT_FULL_READ_CEILING,
            tail_window_bytes: DEFAULT_TAIL_WINDOW,
            max_recent_errors: 100,
            max_message_chars: 500,
            stats_window_hours: 7 * 24,
            recent_window_hours: 24,
            scan_deadline_ms: None,
        }
    }
}

impl MinerConfig {
    pub fn validate(&self) -> LogResult<()> {
        if self.tail_window_bytes == 0 {
            return Err(LogError::Config("tail_window_bytes must be > 0".into()));
        }
        if self.tail_window_bytes > self.full_read_ceiling_bytes {
            return Err(LogError::Config(format!(
                "tail_window_bytes ({}) exceeds full_read_ceiling_bytes ({})",
                self.tail_window_bytes, self.full_read_ceiling_bytes
            )));
        }
        if self.recent_window_hours > self.stats_window_hours {
            return Err(LogError::Config(format!(
                "recent_window_hours ({}) exceeds stats_window_hours ({})",
                self.recent_window_hours, self.stats_window_hours
            )));
        }
        Ok(())
    }

    pub fn tail_limits(&self) -> TailLimits {
        TailLimits {
            full_read_ceiling: self.full_read_ceiling_bytes,
            tail_window: self.tail_window_bytes,
        }
    }

    pub fn stats_window(&self) -> TimeDelta {
        hours(self.stats_window_hours)
    }

    pub fn recent_window(&self) -> TimeDelta {
        hours(self.recent_window_hours)
    }

    pub fn scan_deadline(&self) -> Option<Duration> {
        self.scan_deadline_ms.map(Duration::from_millis)
    }
}

fn hours(h: u64) -> TimeDelta {
    i64::try_from(h)
        .ok()
        .and_then(TimeDelta::try_hours)
        .unwrap_or(TimeDelta::MAX)
}
