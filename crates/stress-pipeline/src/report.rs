//! Per-topic statistics and the end-of-run summary block.

use crate::config::StressConfig;
use chrono::{DateTime, Local};
use std::time::Duration;
use stress_generator::DataFormat;
use stress_transport::Statistician;
use tracing::info;

/// Smallest elapsed time used as a rate denominator, in seconds.
pub const MIN_ELAPSED_SECS: f64 = 0.001;

const BYTES_PER_MIB: f64 = (1u64 << 20) as f64;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f %z";

/// Running totals for one topic.
///
/// Only the aggregator mutates a report while a run is in progress.
#[derive(Debug, Clone)]
pub struct Report {
    pub name: String,
    pub start_time: DateTime<Local>,
    pub end_time: DateTime<Local>,
    pub threads: usize,
    pub data_format: DataFormat,
    pub total_bytes: u64,
    /// Sum of send times of successful requests.
    pub total_elapsed: Duration,
    pub total_rows: u64,
    pub success_rows: u64,
    pub failed_rows: u64,
    pub success_requests: u64,
    pub failed_requests: u64,
    pub total_requests: u64,
    pub rows_per_batch: u64,
    /// MiB per second of send time.
    pub bytes_per_second: f64,
    /// Rows per second of send time.
    pub rows_per_second: f64,
}

impl Report {
    pub fn new(name: impl Into<String>, config: &StressConfig) -> Self {
        let now = Local::now();
        Self {
            name: name.into(),
            start_time: now,
            end_time: now,
            threads: config.threads,
            data_format: config.data_format,
            total_bytes: 0,
            total_elapsed: Duration::ZERO,
            total_rows: 0,
            success_rows: 0,
            failed_rows: 0,
            success_requests: 0,
            failed_requests: 0,
            total_requests: 0,
            rows_per_batch: config.message_size as u64,
            bytes_per_second: 0.0,
            rows_per_second: 0.0,
        }
    }

    /// Fold one outcome into the totals and refresh the rates.
    pub fn record(&mut self, stat: &Statistician) {
        if stat.success {
            self.success_rows += self.rows_per_batch;
            self.success_requests += 1;
            self.total_bytes += stat.bytes_sent;
            self.total_elapsed += stat.elapsed;
        } else {
            self.failed_rows += self.rows_per_batch;
            self.failed_requests += 1;
        }
        self.total_rows += self.rows_per_batch;
        self.total_requests += 1;
        self.refresh_rates();
    }

    fn refresh_rates(&mut self) {
        if self.success_requests == 0 {
            self.bytes_per_second = 0.0;
            self.rows_per_second = 0.0;
            return;
        }
        let secs = self.total_elapsed.as_secs_f64().max(MIN_ELAPSED_SECS);
        self.bytes_per_second = self.total_mib() / secs;
        self.rows_per_second = self.total_rows as f64 / secs;
    }

    pub fn total_mib(&self) -> f64 {
        self.total_bytes as f64 / BYTES_PER_MIB
    }

    /// Stamp the time the topic's consumer finished.
    pub fn finish(&mut self, at: DateTime<Local>) {
        self.end_time = at.max(self.start_time);
    }

    /// Wall-clock time between start and end.
    pub fn wall_elapsed(&self) -> Duration {
        (self.end_time - self.start_time).to_std().unwrap_or_default()
    }

    pub fn summary_lines(&self) -> Vec<String> {
        let spent = self.total_elapsed;
        vec![
            format!("==============Summary for Topic {}======================", self.name),
            format!("Start At: {}", self.start_time.format(TIME_FORMAT)),
            format!("Threads: {}", self.threads),
            format!("Data Format: {}", self.data_format),
            format!(
                "SpentTime: {:.3}s ({} Milliseconds)",
                spent.as_secs_f64(),
                spent.as_millis()
            ),
            format!("Transmit Rows: {} (Total transmit rows)", self.total_rows),
            format!(
                "Transmit MiB: {:.3} MiB ({} bytes)",
                self.total_mib(),
                self.total_bytes
            ),
            format!("Transmit Failed Rows: {}", self.failed_rows),
            format!("Transmit Successful Rows: {}", self.success_rows),
            format!("Rows Per Message: {} R/P", self.rows_per_batch),
            format!(
                "Transmission Rate1: {:.3} M/s (MiB per seconds)",
                self.bytes_per_second
            ),
            format!(
                "Transmission Rate2: {:.3} R/s (Rows per seconds)",
                self.rows_per_second
            ),
            format!("Total Requests Sent: {}", self.total_requests),
            format!("Failed Requests: {}", self.failed_requests),
            format!("Successful Requests: {}", self.success_requests),
            format!("ElapsedTime: {:.3} s", self.wall_elapsed().as_secs_f64()),
            format!("StopTime: {}", self.end_time.format(TIME_FORMAT)),
        ]
    }

    /// Log the summary block and write it to stdout.
    pub fn print(&self) {
        let lines = self.summary_lines();
        for line in &lines {
            info!("{}", line);
        }
        println!("{}", lines.join("\n"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> StressConfig {
        StressConfig::from_toml_str(
            r#"
            topics = ["a"]
            threads = 2
            message_size = 10
            message_num = 5
            data_format = "avro"
            endpoint = "h:1"
            "#,
        )
        .unwrap()
    }

    fn check_invariants(report: &Report) {
        assert_eq!(
            report.total_requests,
            report.success_requests + report.failed_requests
        );
        assert_eq!(report.total_rows, report.success_rows + report.failed_rows);
        assert!(report.bytes_per_second.is_finite() && report.bytes_per_second >= 0.0);
        assert!(report.rows_per_second.is_finite() && report.rows_per_second >= 0.0);
    }

    #[test]
    fn test_success_updates_totals() {
        let mut report = Report::new("a", &config());
        report.record(&Statistician::succeeded("a", 1 << 20, Duration::from_secs(2)));

        assert_eq!(report.success_rows, 10);
        assert_eq!(report.total_bytes, 1 << 20);
        assert_eq!(report.total_elapsed, Duration::from_secs(2));
        assert!((report.bytes_per_second - 0.5).abs() < 1e-9);
        assert!((report.rows_per_second - 5.0).abs() < 1e-9);
        check_invariants(&report);
    }

    #[test]
    fn test_failure_adds_no_bytes_or_time() {
        let mut report = Report::new("a", &config());
        for _ in 0..5 {
            report.record(&Statistician::failed("a", Duration::from_secs(1)));
            check_invariants(&report);
        }

        assert_eq!(report.failed_rows, 50);
        assert_eq!(report.success_rows, 0);
        assert_eq!(report.total_bytes, 0);
        assert_eq!(report.total_elapsed, Duration::ZERO);
        assert_eq!(report.bytes_per_second, 0.0);
        assert_eq!(report.rows_per_second, 0.0);
    }

    #[test]
    fn test_zero_elapsed_uses_floor() {
        let mut report = Report::new("a", &config());
        report.record(&Statistician::succeeded("a", 1024, Duration::ZERO));

        assert!((report.rows_per_second - 10.0 / MIN_ELAPSED_SECS).abs() < 1e-6);
        check_invariants(&report);
    }

    #[test]
    fn test_mixed_outcomes() {
        let mut report = Report::new("a", &config());
        report.record(&Statistician::succeeded("a", 100, Duration::from_millis(10)));
        report.record(&Statistician::failed("a", Duration::from_millis(10)));
        report.record(&Statistician::succeeded("a", 100, Duration::from_millis(10)));

        assert_eq!(report.total_requests, 3);
        assert_eq!(report.success_requests, 2);
        assert_eq!(report.failed_rows, 10);
        check_invariants(&report);
    }

    #[test]
    fn test_summary_block() {
        let mut report = Report::new("flows", &config());
        report.record(&Statistician::succeeded("flows", 2048, Duration::from_millis(1500)));
        report.finish(report.start_time + chrono::Duration::seconds(3));

        let lines = report.summary_lines();
        assert_eq!(lines.len(), 17);
        assert!(lines[0].contains("Summary for Topic flows"));
        assert_eq!(lines[2], "Threads: 2");
        assert_eq!(lines[3], "Data Format: avro");
        assert_eq!(lines[4], "SpentTime: 1.500s (1500 Milliseconds)");
        assert_eq!(lines[9], "Rows Per Message: 10 R/P");
        assert_eq!(lines[15], "ElapsedTime: 3.000 s");
        assert!(lines[16].starts_with("StopTime: "));
    }

    #[test]
    fn test_finish_never_precedes_start() {
        let mut report = Report::new("a", &config());
        report.finish(report.start_time - chrono::Duration::seconds(5));
        assert_eq!(report.wall_elapsed(), Duration::ZERO);
    }
}
