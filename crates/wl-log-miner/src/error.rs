//! Log mining error types.

use thiserror::Error;

/// Errors that can occur while listing or reading log files.
///
/// None of these escape a scan: the miner logs them and carries on with
/// the remaining files.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("log directory not found: {0}")]
    NotFound(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl LogError {
    /// Wrap an I/O error with the path or file name it happened on.
    pub fn io(subject: impl std::fmt::Display, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound(subject.to_string())
        } else {
            Self::Io(format!("{subject}: {err}"))
        }
    }
}

/// Convenience alias for log mining results.
pub type LogResult<T> = Result<T, LogError>;
