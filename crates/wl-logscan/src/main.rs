//! wl-logscan: one point-in-time scan of a log directory, printed as JSON.
//!
//! Usage: `wl-logscan [CONFIG] [LOG_DIR]`. Logs go to stderr so stdout only
//! carries the result.

use chrono::Utc;
use tracing_subscriber::EnvFilter;

use wl_log_miner::LogMiner;
use wl_logscan::config::LogscanConfig;
use wl_logscan::output;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "wl-logscan starting");

    // ── Load config ─────────────────────────────────────────────
    let mut args = std::env::args().skip(1);
    let config_path = args
        .next()
        .unwrap_or_else(|| "/etc/wl-monitoring/logscan.toml".to_string());

    let mut config = LogscanConfig::from_file(&config_path)?;
    if let Some(dir) = args.next() {
        config.log_dir = dir.into();
    }
    tracing::info!(log_dir = %config.log_dir.display(), "config loaded");

    // ── Scan ────────────────────────────────────────────────────
    let miner = LogMiner::for_directory(&config.log_dir, config.miner.clone())?;
    let result = miner.scan().await;

    println!("{}", output::render(&result, Utc::now(), config.pretty)?);
    Ok(())
}
