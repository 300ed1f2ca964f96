//! Log mining engine for rotating application logs.
//!
//! Scans a directory of `*.log` files written as
//! `[<date>] <channel>.<LEVEL>: <message>` and produces:
//!
//! - severity counts over the trailing 24h / 7d windows, and
//! - the most recent error-class entries across all files, newest first.
//!
//! Large files are only read through a bounded tail window, so a scan's
//! memory use does not grow with file size. Unreadable files and malformed
//! lines are skipped; a scan never fails.

pub mod analysis;
pub mod catalog;
pub mod config;
pub mod deadline;
pub mod error;
pub mod grammar;
pub mod miner;
pub mod mock;
pub mod source;
pub mod tail;
pub mod types;

// Re-export key types for convenience
pub use config::MinerConfig;
pub use error::{LogError, LogResult};
pub use miner::LogMiner;
pub use mock::MockLogSource;
pub use source::{FileLogSource, LogSource, OpenedLog};
pub use tail::{TailLimits, TailPlan, TailReader};
pub use types::{
    EntryTime, LogFileDescriptor, LogSeverity, ParsedLogEntry, RecentErrorEntry, ScanResult,
    WindowStats,
};
