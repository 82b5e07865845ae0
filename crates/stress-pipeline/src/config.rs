//! Run configuration loaded from a TOML file.
//!
//! ```toml
//! topics = ["flows_a", "flows_b"]
//! threads = 4
//! message_size = 1000
//! message_num = 10000
//! run_timeout = 0
//! data_format = "csv"
//! method = 1
//! endpoint = "127.0.0.1:8080"
//! user = "loader"
//! password = "secret"
//! ```

use crate::error::ConfigError;
use crate::stop::StopCondition;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use stress_generator::DataFormat;
use stress_transport::{TransportMethod, TransportSettings};
use tracing::debug;

fn default_threads() -> usize {
    1
}

fn default_message_size() -> usize {
    1
}

fn default_method() -> u8 {
    1
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

/// Longest accepted `run_timeout`, one year in minutes.
pub const MAX_RUN_TIMEOUT_MINUTES: f64 = 365.0 * 24.0 * 60.0;

/// Parameters of one stress run. Immutable once validated.
#[derive(Debug, Clone, Deserialize)]
pub struct StressConfig {
    /// Destination topics, in report order.
    #[serde(default)]
    pub topics: Vec<String>,

    /// Concurrency factor. Consumers use this many workers per topic and
    /// the producer uses twice as many.
    #[serde(default = "default_threads")]
    pub threads: usize,

    /// Rows per batch.
    #[serde(default = "default_message_size")]
    pub message_size: usize,

    /// Batches per topic. Zero means the run is bounded by `run_timeout`.
    #[serde(default)]
    pub message_num: u64,

    /// Wall-clock limit in minutes. Zero means the run is bounded by
    /// `message_num`.
    #[serde(default)]
    pub run_timeout: f64,

    pub data_format: DataFormat,

    /// 1 for HTTP, 2 for Kafka.
    #[serde(default = "default_method")]
    pub method: u8,

    #[serde(default)]
    pub brokers: Vec<String>,

    /// HTTP `host:port`.
    #[serde(default)]
    pub endpoint: String,

    #[serde(default)]
    pub user: String,

    #[serde(default)]
    pub password: String,

    /// Pause the producer between batch submissions.
    #[serde(default)]
    pub flow_control: bool,

    #[serde(default)]
    pub flow_interval_ms: u64,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

/// Worker pool and buffer sizes derived from `threads`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSizing {
    /// Producer workers.
    pub producer: usize,
    /// Workers per topic consumer.
    pub consumer: usize,
    /// Buffered batches per topic pipe.
    pub pipe_capacity: usize,
    /// Buffered outcomes on the stats stream.
    pub stats_capacity: usize,
}

impl PoolSizing {
    pub fn from_threads(threads: usize) -> Self {
        let producer = threads * 2;
        Self {
            producer,
            consumer: threads,
            pipe_capacity: producer + 1,
            stats_capacity: threads,
        }
    }
}

impl StressConfig {
    /// Read, parse and validate a config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded config from {}", path.display());
        Self::from_toml_str(&content)
    }

    /// Parse and validate config text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: StressConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every rule a run depends on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.topics.is_empty() {
            return Err(ConfigError::MissingTopics);
        }
        let mut seen = HashSet::new();
        for topic in &self.topics {
            if !seen.insert(topic.as_str()) {
                return Err(ConfigError::DuplicateTopic(topic.clone()));
            }
        }

        if self.threads == 0 {
            return Err(ConfigError::ZeroThreads);
        }
        if self.message_size == 0 {
            return Err(ConfigError::ZeroMessageSize);
        }

        if !(0.0..=MAX_RUN_TIMEOUT_MINUTES).contains(&self.run_timeout) {
            return Err(ConfigError::InvalidRunTimeout(self.run_timeout));
        }
        Duration::try_from_secs_f64(self.run_timeout * 60.0)
            .map_err(|_| ConfigError::InvalidRunTimeout(self.run_timeout))?;
        match (self.message_num > 0, self.run_timeout > 0.0) {
            (true, true) => return Err(ConfigError::ConflictingStopConditions),
            (false, false) => return Err(ConfigError::NoStopCondition),
            _ => {}
        }

        match self.transport_method()? {
            TransportMethod::Kafka if self.brokers.is_empty() => Err(ConfigError::MissingBrokers),
            TransportMethod::Http if self.endpoint.trim().is_empty() => {
                Err(ConfigError::MissingEndpoint)
            }
            _ => Ok(()),
        }
    }

    pub fn transport_method(&self) -> Result<TransportMethod, ConfigError> {
        TransportMethod::try_from(self.method).map_err(|_| ConfigError::UnknownMethod(self.method))
    }

    /// When the run ends. Only meaningful on a validated config; an
    /// out-of-range `run_timeout` is clamped rather than trusted.
    pub fn stop_condition(&self) -> StopCondition {
        if self.message_num > 0 {
            StopCondition::Count(self.message_num)
        } else {
            let minutes = self.run_timeout.clamp(0.0, MAX_RUN_TIMEOUT_MINUTES);
            let limit = Duration::try_from_secs_f64(minutes * 60.0).unwrap_or_default();
            StopCondition::Deadline(limit)
        }
    }

    pub fn sizing(&self) -> PoolSizing {
        PoolSizing::from_threads(self.threads)
    }

    /// Pause between producer submissions, if flow control is on.
    pub fn flow_interval(&self) -> Option<Duration> {
        (self.flow_control && self.flow_interval_ms > 0)
            .then(|| Duration::from_millis(self.flow_interval_ms))
    }

    /// Rows each topic receives in a fully successful count-bounded run.
    pub fn total_rows(&self) -> Option<u64> {
        (self.message_num > 0).then(|| self.message_num * self.message_size as u64)
    }

    pub fn transport_settings(&self) -> Result<TransportSettings, ConfigError> {
        Ok(TransportSettings {
            method: self.transport_method()?,
            data_format: self.data_format,
            endpoint: self.endpoint.clone(),
            user: self.user.clone(),
            password: self.password.clone(),
            brokers: self.brokers.clone(),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASE: &str = r#"
        topics = ["a", "b"]
        threads = 2
        message_size = 10
        message_num = 5
        data_format = "csv"
        method = 1
        endpoint = "127.0.0.1:8080"
    "#;

    fn with(extra: &str) -> String {
        format!("{BASE}\n{extra}")
    }

    #[test]
    fn test_parse_valid_config() {
        let config = StressConfig::from_toml_str(BASE).unwrap();
        assert_eq!(config.topics, vec!["a", "b"]);
        assert_eq!(config.threads, 2);
        assert_eq!(config.data_format, DataFormat::Csv);
        assert_eq!(config.request_timeout_ms, 30_000);
        assert_eq!(config.stop_condition(), StopCondition::Count(5));
        assert_eq!(config.total_rows(), Some(50));
        assert_eq!(config.flow_interval(), None);
    }

    #[test]
    fn test_sizing_from_threads() {
        let sizing = PoolSizing::from_threads(3);
        assert_eq!(sizing.producer, 6);
        assert_eq!(sizing.consumer, 3);
        assert_eq!(sizing.pipe_capacity, 7);
        assert_eq!(sizing.stats_capacity, 3);
    }

    #[test]
    fn test_missing_topics() {
        let err = StressConfig::from_toml_str(
            r#"
            message_size = 10
            message_num = 5
            data_format = "csv"
            endpoint = "h:1"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingTopics));
    }

    #[test]
    fn test_duplicate_topics() {
        let text = BASE.replace(r#"["a", "b"]"#, r#"["a", "a"]"#);
        let err = StressConfig::from_toml_str(&text).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateTopic(t) if t == "a"));
    }

    #[test]
    fn test_both_stop_conditions_rejected() {
        let err = StressConfig::from_toml_str(&with("run_timeout = 1.5")).unwrap_err();
        assert!(matches!(err, ConfigError::ConflictingStopConditions));
    }

    #[test]
    fn test_no_stop_condition_rejected() {
        let text = BASE.replace("message_num = 5", "");
        let err = StressConfig::from_toml_str(&text).unwrap_err();
        assert!(matches!(err, ConfigError::NoStopCondition));
    }

    #[test]
    fn test_deadline_in_minutes() {
        let text = BASE.replace("message_num = 5", "run_timeout = 0.5");
        let config = StressConfig::from_toml_str(&text).unwrap();
        assert_eq!(
            config.stop_condition(),
            StopCondition::Deadline(Duration::from_secs(30))
        );
        assert_eq!(config.total_rows(), None);
    }

    #[test]
    fn test_negative_run_timeout_rejected() {
        let text = BASE.replace("message_num = 5", "run_timeout = -1.0");
        let err = StressConfig::from_toml_str(&text).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRunTimeout(_)));
    }

    #[test]
    fn test_huge_run_timeout_rejected() {
        for value in ["1e300", "525601.0", "inf", "nan"] {
            let text = BASE.replace("message_num = 5", &format!("run_timeout = {value}"));
            let err = StressConfig::from_toml_str(&text).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidRunTimeout(_)), "{value}");
        }

        let text = BASE.replace("message_num = 5", "run_timeout = 525600.0");
        let config = StressConfig::from_toml_str(&text).unwrap();
        assert_eq!(
            config.stop_condition(),
            StopCondition::Deadline(Duration::from_secs(525_600 * 60))
        );
    }

    #[test]
    fn test_stop_condition_never_panics_on_unvalidated_timeout() {
        let mut config = StressConfig::from_toml_str(BASE).unwrap();
        config.message_num = 0;
        config.run_timeout = 1e300;
        assert_eq!(
            config.stop_condition(),
            StopCondition::Deadline(Duration::from_secs(525_600 * 60))
        );
        config.run_timeout = f64::NAN;
        assert_eq!(config.stop_condition(), StopCondition::Deadline(Duration::ZERO));
    }

    #[test]
    fn test_unsupported_format_rejected() {
        let text = BASE.replace(r#""csv""#, r#""json""#);
        let err = StressConfig::from_toml_str(&text).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("Unsupported data format 'json'"));
    }

    #[test]
    fn test_zero_threads_and_size() {
        let err = StressConfig::from_toml_str(&BASE.replace("threads = 2", "threads = 0"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::ZeroThreads));

        let err = StressConfig::from_toml_str(&BASE.replace("message_size = 10", "message_size = 0"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::ZeroMessageSize));
    }

    #[test]
    fn test_method_rules() {
        let err = StressConfig::from_toml_str(&BASE.replace("method = 1", "method = 3"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownMethod(3)));

        let err = StressConfig::from_toml_str(&BASE.replace("method = 1", "method = 2"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingBrokers));

        let kafka = BASE.replace("method = 1", "method = 2\nbrokers = [\"k:9092\"]");
        let config = StressConfig::from_toml_str(&kafka).unwrap();
        let settings = config.transport_settings().unwrap();
        assert_eq!(settings.method, TransportMethod::Kafka);
        assert_eq!(settings.brokers, vec!["k:9092"]);

        let err = StressConfig::from_toml_str(&BASE.replace(r#""127.0.0.1:8080""#, r#""""#))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingEndpoint));
    }

    #[test]
    fn test_flow_control() {
        let config =
            StressConfig::from_toml_str(&with("flow_control = true\nflow_interval_ms = 20"))
                .unwrap();
        assert_eq!(config.flow_interval(), Some(Duration::from_millis(20)));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(BASE.as_bytes()).unwrap();

        let config = StressConfig::from_file(file.path()).unwrap();
        assert_eq!(config.message_size, 10);

        let err = StressConfig::from_file("/nonexistent/stress.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
