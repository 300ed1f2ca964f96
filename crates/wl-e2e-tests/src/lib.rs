//! End-to-end tests for the log mining engine live in `tests/`.
//!
//! They scan real temporary directories: real mtimes, real seeks into
//! files larger than the full-read ceiling, and the CLI's config and
//! output path.
