//! Core log mining types: severities, file descriptors and scan output.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// `YYYY-MM-DDTHH:MM:SS+HH:MM`, the format every date in a scan result uses.
pub const ATOM_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

// ── Severity ──────────────────────────────────────────────────

/// Log severity level, ordered from least to most severe.
///
/// Variant declaration order matters: `#[derive(Ord)]` uses it,
/// so Debug < Info < ... < Alert < Emergency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogSeverity {
    Debug,
    Info,
    Notice,
    Warning,
    Error,
    Critical,
    Alert,
    Emergency,
}

impl LogSeverity {
    pub const ALL: [Self; 8] = [
        Self::Debug,
        Self::Info,
        Self::Notice,
        Self::Warning,
        Self::Error,
        Self::Critical,
        Self::Alert,
        Self::Emergency,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Notice => "NOTICE",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
            Self::Alert => "ALERT",
            Self::Emergency => "EMERGENCY",
        }
    }

    /// Look up a level by name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(name))
    }

    /// ERROR and everything above it.
    pub fn is_error_class(&self) -> bool {
        *self >= Self::Error
    }

    pub fn is_warning_class(&self) -> bool {
        *self == Self::Warning
    }
}

impl std::fmt::Display for LogSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Parsed line ───────────────────────────────────────────────

/// One structured log line, borrowed from the line it was parsed from.
///
/// The date is kept as text; callers parse it only when they need it
/// (see [`crate::grammar::parse_timestamp`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedLogEntry<'a> {
    pub date: &'a str,
    pub channel: &'a str,
    pub level: LogSeverity,
    pub message: &'a str,
}

// ── File descriptor ───────────────────────────────────────────

/// A candidate log file found by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogFileDescriptor {
    pub name: String,
    #[serde(rename = "size_kb", serialize_with = "serialize_size_kb")]
    pub size_bytes: u64,
    #[serde(rename = "modified", serialize_with = "serialize_atom")]
    pub modified_at: DateTime<Utc>,
}

impl LogFileDescriptor {
    pub fn new(name: impl Into<String>, size_bytes: u64, modified_at: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            size_bytes,
            modified_at,
        }
    }

    /// Size in KiB, rounded half up.
    pub fn size_kb(&self) -> u64 {
        self.size_bytes.saturating_add(512) / 1024
    }
}

fn serialize_size_kb<S: Serializer>(size_bytes: &u64, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(size_bytes.saturating_add(512) / 1024)
}

fn serialize_atom<S: Serializer>(at: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(&at.format(ATOM_FORMAT))
}

// ── Window stats ──────────────────────────────────────────────

/// Severity counts over the trailing 24h / 7d windows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WindowStats {
    pub errors_24h: u64,
    pub errors_7d: u64,
    pub warnings_24h: u64,
    /// Error-class lines within 24h, per channel.
    pub by_channel: BTreeMap<String, u64>,
}

impl WindowStats {
    /// Fold another file's counts into this one.
    pub fn merge(&mut self, other: WindowStats) {
        self.errors_24h += other.errors_24h;
        self.errors_7d += other.errors_7d;
        self.warnings_24h += other.warnings_24h;
        for (channel, count) in other.by_channel {
            *self.by_channel.entry(channel).or_default() += count;
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// ── Recent errors ─────────────────────────────────────────────

/// When a recent error happened, if its date could be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryTime {
    /// Parsed date, keeping the offset written in the log line.
    Parsed(DateTime<FixedOffset>),
    /// The date text as written, when no format matched.
    Raw(String),
}

impl EntryTime {
    pub fn parsed(&self) -> Option<DateTime<FixedOffset>> {
        match self {
            Self::Parsed(at) => Some(*at),
            Self::Raw(_) => None,
        }
    }

    /// Newest first; unparsed dates sort after every parsed one.
    pub fn cmp_newest_first(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Parsed(a), Self::Parsed(b)) => b.cmp(a),
            (Self::Parsed(_), Self::Raw(_)) => Ordering::Less,
            (Self::Raw(_), Self::Parsed(_)) => Ordering::Greater,
            (Self::Raw(_), Self::Raw(_)) => Ordering::Equal,
        }
    }
}

impl std::fmt::Display for EntryTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parsed(at) => write!(f, "{}", at.format(ATOM_FORMAT)),
            Self::Raw(raw) => f.write_str(raw),
        }
    }
}

impl Serialize for EntryTime {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

/// An error-class line picked up by the recent-error pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentErrorEntry {
    pub date: EntryTime,
    pub level: LogSeverity,
    pub channel: String,
    /// Trimmed, at most `max_message_chars` characters.
    pub message: String,
}

// ── Scan result ───────────────────────────────────────────────

/// Everything one scan produces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanResult {
    pub files: Vec<LogFileDescriptor>,
    pub stats: WindowStats,
    pub recent_errors: Vec<RecentErrorEntry>,
}
