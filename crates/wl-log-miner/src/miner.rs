//! Scan orchestration: catalog, then stats, then recent errors.

use chrono::{DateTime, Utc};

use crate::analysis::window_stats::cutoff;
use crate::analysis::{RecentErrorOptions, StatsWindows, recent_errors, window_stats};
use crate::config::MinerConfig;
use crate::deadline::Deadline;
use crate::error::LogResult;
use crate::source::{FileLogSource, LogSource};
use crate::types::ScanResult;

/// Point-in-time scanner over one log source.
pub struct LogMiner<S> {
    source: S,
    config: MinerConfig,
}

impl LogMiner<FileLogSource> {
    /// Miner over `*.log` files in `dir`.
    pub fn for_directory(
        dir: impl Into<std::path::PathBuf>,
        config: MinerConfig,
    ) -> LogResult<Self> {
        Self::new(FileLogSource::new(dir), config)
    }
}

impl<S: LogSource> LogMiner<S> {
    pub fn new(source: S, config: MinerConfig) -> LogResult<Self> {
        config.validate()?;
        Ok(Self { source, config })
    }

    pub fn config(&self) -> &MinerConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Scan as of now.
    pub async fn scan(&self) -> ScanResult {
        self.scan_at(Utc::now()).await
    }

    /// Scan with every window measured back from `now`.
    ///
    /// Never fails: an unlistable directory gives an empty result, and files
    /// that cannot be read are left out of the counts.
    pub async fn scan_at(&self, now: DateTime<Utc>) -> ScanResult {
        let files = match self.source.list_files().await {
            Ok(files) => files,
            Err(e) => {
                tracing::debug!(error = %e, "log directory unavailable");
                return ScanResult::default();
            }
        };

        let deadline = Deadline::start(self.config.scan_deadline());
        let limits = self.config.tail_limits();

        let windows = StatsWindows::new(
            now,
            self.config.recent_window(),
            self.config.stats_window(),
        );
        let stats = window_stats::aggregate(&self.source, &files, &windows, &limits, &deadline).await;

        let opts = RecentErrorOptions {
            cutoff: cutoff(now, self.config.recent_window()),
            max_entries: self.config.max_recent_errors,
            max_message_chars: self.config.max_message_chars,
        };
        let recent_errors =
            recent_errors::collect(&self.source, &files, &opts, &limits, &deadline).await;

        tracing::info!(
            files = files.len(),
            errors_24h = stats.errors_24h,
            errors_7d = stats.errors_7d,
            warnings_24h = stats.warnings_24h,
            recent_errors = recent_errors.len(),
            "log scan complete"
        );

        ScanResult {
            files,
            stats,
            recent_errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LogError;
    use crate::mock::MockLogSource;
    use crate::types::{EntryTime, LogSeverity};
    use chrono::{TimeDelta, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
    }

    fn scenario_source() -> MockLogSource {
        let mut source = MockLogSource::new();
        source.add_file(
            "app.log",
            vec![
                "[2024-01-15 10:00:00] app.ERROR: disk full".into(),
                "[2024-01-15 10:05:00] app.WARNING: low disk".into(),
                "[2024-01-15 10:10:00] app.ERROR: disk full again".into(),
                "[2024-01-15 10:15:00] app.INFO: recovered".into(),
            ],
            now(),
        );
        source
    }

    #[tokio::test]
    async fn single_file_scenario() {
        let miner = LogMiner::new(scenario_source(), MinerConfig::default()).unwrap();
        let result = miner.scan_at(now()).await;

        assert_eq!(result.files.len(), 1);
        assert_eq!(result.files[0].name, "app.log");

        assert_eq!(result.stats.errors_24h, 2);
        assert_eq!(result.stats.errors_7d, 2);
        assert_eq!(result.stats.warnings_24h, 1);
        assert_eq!(result.stats.by_channel.len(), 1);
        assert_eq!(result.stats.by_channel["app"], 2);

        assert_eq!(result.recent_errors.len(), 2);
        let first = &result.recent_errors[0];
        assert_eq!(first.message, "disk full again");
        assert_eq!(first.level, LogSeverity::Error);
        assert_eq!(first.channel, "app");
        assert_eq!(first.date.to_string(), "2024-01-15T10:10:00+00:00");
        assert_eq!(result.recent_errors[1].message, "disk full");
    }

    #[tokio::test]
    async fn scenario_serializes_to_wire_shape() {
        let miner = LogMiner::new(scenario_source(), MinerConfig::default()).unwrap();
        let json = serde_json::to_value(miner.scan_at(now()).await).unwrap();

        assert_eq!(json["files"][0]["name"], "app.log");
        assert_eq!(json["files"][0]["size_kb"], 0);
        assert_eq!(json["files"][0]["modified"], "2024-01-15T10:30:00+00:00");
        assert_eq!(json["stats"]["errors_24h"], 2);
        assert_eq!(json["stats"]["by_channel"]["app"], 2);
        assert_eq!(json["recent_errors"][0]["date"], "2024-01-15T10:10:00+00:00");
        assert_eq!(json["recent_errors"][0]["level"], "ERROR");
        assert_eq!(json["recent_errors"][0]["message"], "disk full again");
    }

    #[tokio::test]
    async fn scanning_twice_is_identical() {
        let mut source = scenario_source();
        source.add_file(
            "worker.log",
            vec![
                "[2024-01-15 09:00:00] queue.CRITICAL: consumer died".into(),
                "[undated] queue.ERROR: lost message".into(),
            ],
            now() - TimeDelta::hours(1),
        );
        let miner = LogMiner::new(source, MinerConfig::default()).unwrap();
        let first = miner.scan_at(now()).await;
        let second = miner.scan_at(now()).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn missing_directory_yields_empty_result() {
        let miner = LogMiner::new(MockLogSource::missing_directory(), MinerConfig::default()).unwrap();
        let result = miner.scan_at(now()).await;
        assert_eq!(result, ScanResult::default());
    }

    #[tokio::test]
    async fn unreadable_file_still_listed() {
        let mut source = scenario_source();
        source.add_unreadable("locked.log", 4096, now() + TimeDelta::seconds(1));
        let miner = LogMiner::new(source, MinerConfig::default()).unwrap();
        let result = miner.scan_at(now()).await;

        let names: Vec<_> = result.files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["locked.log", "app.log"]);
        assert_eq!(result.files[0].size_kb(), 4);
        assert_eq!(result.stats.errors_24h, 2);
        assert_eq!(result.recent_errors.len(), 2);
    }

    #[tokio::test]
    async fn invariants_hold_across_many_files() {
        let mut source = MockLogSource::new();
        for f in 0..5i64 {
            let lines = (0..60i64)
                .map(|i| {
                    let at = now() - TimeDelta::minutes(f * 300 + i * 7);
                    let level = ["ERROR", "WARNING", "CRITICAL", "INFO"][(i % 4) as usize];
                    format!("[{}] ch{}.{level}: event {f}/{i}", at.format("%Y-%m-%d %H:%M:%S"), i % 3)
                })
                .rev()
                .collect();
            source.add_file(format!("f{f}.log"), lines, now() - TimeDelta::minutes(f * 300));
        }
        let miner = LogMiner::new(source, MinerConfig::default()).unwrap();
        let result = miner.scan_at(now()).await;

        assert!(result.stats.errors_24h <= result.stats.errors_7d);
        assert_eq!(
            result.stats.by_channel.values().sum::<u64>(),
            result.stats.errors_24h
        );
        assert!(result.recent_errors.len() <= 100);
        let dates: Vec<_> = result
            .recent_errors
            .iter()
            .map(|e| e.date.parsed().unwrap())
            .collect();
        assert!(dates.windows(2).all(|w| w[0] >= w[1]));
    }

    #[tokio::test]
    async fn custom_limits_apply() {
        let config = MinerConfig {
            max_recent_errors: 1,
            max_message_chars: 4,
            ..MinerConfig::default()
        };
        let miner = LogMiner::new(scenario_source(), config).unwrap();
        let result = miner.scan_at(now()).await;
        assert_eq!(result.recent_errors.len(), 1);
        assert_eq!(result.recent_errors[0].message, "disk");
        assert!(matches!(result.recent_errors[0].date, EntryTime::Parsed(_)));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = MinerConfig {
            tail_window_bytes: 0,
            ..MinerConfig::default()
        };
        assert!(matches!(
            LogMiner::new(MockLogSource::new(), config).err(),
            Some(LogError::Config(_))
        ));
    }
}
