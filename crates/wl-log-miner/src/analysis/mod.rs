//! The two passes a scan makes over the catalog.
//!
//! - `window_stats`: forward pass, counts per severity window.
//! - `recent_errors`: reverse pass, newest error-class entries.
//!
//! Each pass opens and reads files on its own; they share no state.

pub mod recent_errors;
pub mod window_stats;

pub use recent_errors::RecentErrorOptions;
pub use window_stats::StatsWindows;
