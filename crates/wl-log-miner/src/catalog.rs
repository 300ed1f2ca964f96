//! File catalog: candidate `*.log` files in one directory, newest first.

use chrono::{DateTime, Utc};
use std::path::Path;

use crate::error::{LogError, LogResult};
use crate::types::LogFileDescriptor;

/// Whether a file name is a scan candidate: `*.log`, not a dotfile.
pub fn is_candidate(name: &str) -> bool {
    !name.starts_with('.') && name.ends_with(".log")
}

/// Newest modification time first; ties broken by name so repeated scans
/// list files in the same order.
pub fn sort_newest_first(files: &mut [LogFileDescriptor]) {
    files.sort_by(|a, b| {
        b.modified_at
            .cmp(&a.modified_at)
            .then_with(|| a.name.cmp(&b.name))
    });
}

/// Next directory entry, or `None` once the listing ends. A read error
/// partway through ends the listing but keeps what was already found.
fn keep_listing<T>(dir: &Path, next: std::io::Result<Option<T>>) -> Option<T> {
    match next {
        Ok(entry) => entry,
        Err(e) => {
            tracing::debug!(dir = %dir.display(), error = %e, "directory listing cut short");
            None
        }
    }
}

/// List regular `*.log` files directly inside `dir`.
///
/// Fails only when the directory cannot be opened. Symlinks are followed. Entries whose metadata cannot be read are left
/// out; files that exist but cannot be opened are kept, so they still show
/// up in the listing.
pub async fn scan_directory(dir: &Path) -> LogResult<Vec<LogFileDescriptor>> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| LogError::io(dir.display(), e))?;

    let mut files = Vec::new();
    while let Some(entry) = keep_listing(dir, entries.next_entry().await) {
        let Some(name) = entry.file_name().to_str().map(String::from) else {
            continue;
        };
        if !is_candidate(&name) {
            continue;
        }

        let meta = match tokio::fs::metadata(entry.path()).await {
            Ok(meta) => meta,
            Err(e) => {
                tracing::debug!(file = %name, error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !meta.is_file() {
            continue;
        }
        let modified_at = match meta.modified() {
            Ok(at) => DateTime::<Utc>::from(at),
            Err(e) => {
                tracing::debug!(file = %name, error = %e, "no modification time");
                continue;
            }
        };

        files.push(LogFileDescriptor::new(name, meta.len(), modified_at));
    }

    sort_newest_first(&mut files);
    Ok(files)
}
