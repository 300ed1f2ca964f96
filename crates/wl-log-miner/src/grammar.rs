//! Structured line grammar: `[<date>] <channel>.<LEVEL>: <message>`.
//!
//! The pattern is anchored at the start of the line. A line that only
//! contains the shape somewhere in the middle (a stack frame quoting a log
//! message, a prefixed syslog relay) is not an entry.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use std::sync::LazyLock;

use crate::types::{LogSeverity, ParsedLogEntry};

static RE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\[(?P<date>[^\]]+)\] (?P<channel>[A-Za-z0-9_]+)\.(?P<level>(?i:DEBUG|INFO|NOTICE|WARNING|ERROR|CRITICAL|ALERT|EMERGENCY)): (?P<message>.*)$",
    )
    .unwrap()
});

// Date formats carrying their own offset, tried after RFC 3339 / RFC 2822.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f %:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f %z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%d/%b/%Y:%H:%M:%S %z",
];

// Offset-less formats, read as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%d-%b-%Y %H:%M:%S",
    "%b %d %Y %H:%M:%S",
    "%a %b %e %H:%M:%S %Y",
];

// Named zones accepted as a trailing word, all equal to UTC.
const UTC_ZONE_SUFFIXES: &[&str] = &[" UTC", " GMT", " Z"];

/// Match one line against the grammar.
///
/// Returns `None` for anything that is not a structured entry (stack trace
/// continuations, blank lines, foreign formats). That is not an error.
pub fn parse_line(line: &str) -> Option<ParsedLogEntry<'_>> {
    let caps = RE_LINE.captures(line)?;
    let level = LogSeverity::from_name(caps.name("level")?.as_str())?;

    Some(ParsedLogEntry {
        date: caps.name("date")?.as_str(),
        channel: caps.name("channel")?.as_str(),
        level,
        message: caps.name("message")?.as_str(),
    })
}

/// Permissive date parsing for the bracketed date field.
///
/// Offsets written in the text are kept; dates without one are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt);
    }

    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    if let Some(at) = parse_naive(s) {
        return Some(at);
    }
    if let Some(stem) = UTC_ZONE_SUFFIXES.iter().find_map(|z| s.strip_suffix(z)) {
        return parse_naive(stem.trim_end());
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|ndt| ndt.and_utc().fixed_offset());
    }

    // Unix epoch seconds: "@1705312800"
    if let Some(secs) = s.strip_prefix('@') {
        return secs
            .parse::<i64>()
            .ok()
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
            .map(|dt| dt.fixed_offset());
    }

    None
}

fn parse_naive(s: &str) -> Option<DateTime<FixedOffset>> {
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|ndt| ndt.and_utc().fixed_offset())
}
