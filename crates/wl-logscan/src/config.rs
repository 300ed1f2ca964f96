//! Scanner configuration, loadable from TOML.

use serde::Deserialize;
use std::path::PathBuf;
use wl_log_miner::MinerConfig;

/// Top-level configuration for the scanner binary.
#[derive(Debug, Clone, Deserialize)]
pub struct LogscanConfig {
    /// Directory holding the `*.log` files.
    pub log_dir: PathBuf,
    /// Pretty-print the JSON output.
    #[serde(default = "default_pretty")]
    pub pretty: bool,
    /// Scan thresholds; omitted keys keep their defaults.
    #[serde(flatten)]
    pub miner: MinerConfig,
}

fn default_pretty() -> bool {
    true
}

impl LogscanConfig {
    /// Load config from a TOML file path.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }
}
