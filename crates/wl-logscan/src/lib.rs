//! Library half of the wl-logscan command-line scanner.
//!
//! Exposes config loading and output rendering so the end-to-end tests can
//! drive them without spawning the binary.

pub mod config;
pub mod output;
