//! Windowed severity counts across every recently modified file.

use chrono::{DateTime, TimeDelta, Utc};

use crate::deadline::Deadline;
use crate::error::LogResult;
use crate::grammar;
use crate::source::LogSource;
use crate::tail::{TailLimits, TailReader};
use crate::types::{LogFileDescriptor, ParsedLogEntry, WindowStats};

/// Cutoffs for the two stats windows, fixed at the start of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsWindows {
    /// Start of the short (24h) window.
    pub day_cutoff: DateTime<Utc>,
    /// Start of the long (7d) window. Also gates file eligibility by mtime.
    pub week_cutoff: DateTime<Utc>,
}

impl StatsWindows {
    pub fn new(now: DateTime<Utc>, short: TimeDelta, long: TimeDelta) -> Self {
        Self {
            day_cutoff: cutoff(now, short),
            week_cutoff: cutoff(now, long),
        }
    }

    /// Whether a file is eligible at all. Content timestamps do not matter here.
    pub fn admits_file(&self, file: &LogFileDescriptor) -> bool {
        file.modified_at >= self.week_cutoff
    }
}

pub(crate) fn cutoff(now: DateTime<Utc>, window: TimeDelta) -> DateTime<Utc> {
    now.checked_sub_signed(window)
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Count one structured line dated `at`.
pub fn record(
    stats: &mut WindowStats,
    entry: &ParsedLogEntry<'_>,
    at: DateTime<Utc>,
    windows: &StatsWindows,
) {
    if at < windows.week_cutoff {
        return;
    }
    let in_day = at >= windows.day_cutoff;

    if entry.level.is_error_class() {
        stats.errors_7d += 1;
        if in_day {
            stats.errors_24h += 1;
            *stats
                .by_channel
                .entry(entry.channel.to_string())
                .or_default() += 1;
        }
    } else if entry.level.is_warning_class() && in_day {
        stats.warnings_24h += 1;
    }
}

/// Count every line in a file's read window, oldest first.
///
/// Lines outside the grammar and lines whose date does not parse are
/// dropped from every counter.
pub async fn count_lines<R>(
    reader: &mut TailReader<R>,
    windows: &StatsWindows,
) -> LogResult<WindowStats>
where
    R: tokio::io::AsyncRead + tokio::io::AsyncSeek + Unpin,
{
    let mut stats = WindowStats::default();
    let mut lines = 0usize;
    let mut undated = 0usize;

    while let Some(line) = reader.next_line().await? {
        lines += 1;
        let Some(entry) = grammar::parse_line(&line) else {
            continue;
        };
        let Some(at) = grammar::parse_timestamp(entry.date) else {
            undated += 1;
            continue;
        };
        record(&mut stats, &entry, at.with_timezone(&Utc), windows);
    }

    tracing::debug!(
        file = %reader.name(),
        lines,
        undated,
        errors_7d = stats.errors_7d,
        "counted file"
    );
    Ok(stats)
}

async fn count_file(
    source: &dyn LogSource,
    file: &LogFileDescriptor,
    windows: &StatsWindows,
    limits: &TailLimits,
) -> LogResult<WindowStats> {
    let opened = source.open(&file.name).await?;
    let mut reader = TailReader::open(opened.reader, &file.name, opened.size, limits).await?;
    count_lines(&mut reader, windows).await
}

/// Sum the window counts of every eligible file.
///
/// A file that fails to open or read contributes nothing; the rest of the
/// scan goes on.
pub async fn aggregate(
    source: &dyn LogSource,
    files: &[LogFileDescriptor],
    windows: &StatsWindows,
    limits: &TailLimits,
    deadline: &Deadline,
) -> WindowStats {
    let mut total = WindowStats::default();

    for file in files {
        if !windows.admits_file(file) {
            tracing::debug!(file = %file.name, modified = %file.modified_at, "outside stats window");
            continue;
        }
        if deadline.expired() {
            tracing::warn!(file = %file.name, "scan deadline reached, stats incomplete");
            break;
        }
        match count_file(source, file, windows, limits).await {
            Ok(stats) => total.merge(stats),
            Err(e) => tracing::debug!(file = %file.name, error = %e, "skipping file for stats"),
        }
    }

    total
}
