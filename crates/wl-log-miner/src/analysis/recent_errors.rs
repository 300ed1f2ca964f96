//! The most recent error-class entries across all files, newest first.
//!
//! Each file is read through its tail window and walked backwards. The walk
//! stops at the first dated error older than the cutoff: it assumes lines in
//! one file are written in timestamp order, so an out-of-order writer can
//! hide older-but-recent errors that sit behind a stale line.

use chrono::{DateTime, Utc};

use crate::deadline::Deadline;
use crate::error::LogResult;
use crate::grammar;
use crate::source::LogSource;
use crate::tail::{TailLimits, TailReader};
use crate::types::{EntryTime, LogFileDescriptor, RecentErrorEntry};

/// Limits for one recent-error pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecentErrorOptions {
    /// Dated errors older than this end the walk of their file.
    pub cutoff: DateTime<Utc>,
    /// Global cap across all files.
    pub max_entries: usize,
    pub max_message_chars: usize,
}

/// Cut `s` to at most `max_chars` characters, on a character boundary.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Stable sort, newest first. Entries with unparsed dates go last.
pub fn sort_newest_first(entries: &mut [RecentErrorEntry]) {
    entries.sort_by(|a, b| a.date.cmp_newest_first(&b.date));
}

/// Walk `lines` from the last one backwards and keep up to `budget`
/// error-class entries.
pub fn collect_from_lines(
    lines: &[String],
    budget: usize,
    opts: &RecentErrorOptions,
) -> Vec<RecentErrorEntry> {
    let mut found = Vec::new();

    for line in lines.iter().rev() {
        if found.len() >= budget {
            break;
        }
        let Some(entry) = grammar::parse_line(line) else {
            continue;
        };
        if !entry.level.is_error_class() {
            continue;
        }

        // Undated errors are kept but never end the walk: their age is unknown.
        let date = match grammar::parse_timestamp(entry.date) {
            Some(at) if at.with_timezone(&Utc) < opts.cutoff => break,
            Some(at) => EntryTime::Parsed(at),
            None => EntryTime::Raw(entry.date.to_string()),
        };

        found.push(RecentErrorEntry {
            date,
            level: entry.level,
            channel: entry.channel.to_string(),
            message: truncate_chars(entry.message.trim(), opts.max_message_chars).to_string(),
        });
    }

    found
}

async fn errors_from_file(
    source: &dyn LogSource,
    file: &LogFileDescriptor,
    budget: usize,
    opts: &RecentErrorOptions,
    limits: &TailLimits,
) -> LogResult<Vec<RecentErrorEntry>> {
    // The whole read window is held at once, at most the full-read ceiling
    // plus one allocation per line. The walk runs backwards, so it cannot
    // stream.
    let opened = source.open(&file.name).await?;
    let lines = TailReader::open(opened.reader, &file.name, opened.size, limits)
        .await?
        .read_all()
        .await?;
    let found = collect_from_lines(&lines, budget, opts);
    tracing::debug!(file = %file.name, lines = lines.len(), errors = found.len(), "collected recent errors");
    Ok(found)
}

/// Collect recent errors from `files`, which must be ordered newest first.
///
/// Every file is considered regardless of mtime; the cutoff and the cap
/// bound the work instead.
pub async fn collect(
    source: &dyn LogSource,
    files: &[LogFileDescriptor],
    opts: &RecentErrorOptions,
    limits: &TailLimits,
    deadline: &Deadline,
) -> Vec<RecentErrorEntry> {
    let mut errors: Vec<RecentErrorEntry> = Vec::new();

    for file in files {
        if errors.len() >= opts.max_entries {
            break;
        }
        if deadline.expired() {
            tracing::warn!(file = %file.name, "scan deadline reached, recent errors incomplete");
            break;
        }
        let budget = opts.max_entries - errors.len();
        match errors_from_file(source, file, budget, opts, limits).await {
            Ok(found) => errors.extend(found),
            Err(e) => tracing::debug!(file = %file.name, error = %e, "skipping file for recent errors"),
        }
    }

    sort_newest_first(&mut errors);
    errors.truncate(opts.max_entries);
    errors
}
