//! JSON response envelope around a scan result.

use chrono::{DateTime, Utc};
use serde::Serialize;
use wl_log_miner::ScanResult;
use wl_log_miner::types::ATOM_FORMAT;

/// `{ "success": true, "data": ..., "timestamp": ... }`
#[derive(Debug, Serialize)]
pub struct Envelope<'a> {
    pub success: bool,
    pub data: &'a ScanResult,
    pub timestamp: String,
}

impl<'a> Envelope<'a> {
    pub fn new(data: &'a ScanResult, at: DateTime<Utc>) -> Self {
        Self {
            success: true,
            data,
            timestamp: at.format(ATOM_FORMAT).to_string(),
        }
    }
}

/// Render a scan result as the envelope JSON.
pub fn render(result: &ScanResult, at: DateTime<Utc>, pretty: bool) -> serde_json::Result<String> {
    let envelope = Envelope::new(result, at);
    if pretty {
        serde_json::to_string_pretty(&envelope)
    } else {
        serde_json::to_string(&envelope)
    }
}
