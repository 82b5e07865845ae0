//! topic-stress
//!
//! A load generator that streams batches of synthetic network-flow records to
//! one or more topics over HTTP or Kafka and reports per-topic throughput.
//!
//! # CLI Usage
//!
//! ```bash
//! # Run with ./stress.toml
//! topic-stress
//!
//! # Explicit config, debug logging, no log file
//! topic-stress --config conf/stress.toml --log-level debug --no-log-file
//!
//! # Validate the config and print the plan without sending anything
//! topic-stress --config conf/stress.toml --dry-run
//! ```
//!
//! The pipeline itself lives in the `stress-pipeline` crate; this crate only
//! holds the command line surface and log setup.

use clap::Parser;
use std::path::PathBuf;
use stress_generator::{avro_schema_json, DataFormat};
use stress_pipeline::{StopCondition, StressConfig};
use stress_transport::TransportMethod;

pub mod logging;

pub use logging::LogOptions;

/// Command line arguments.
#[derive(Parser, Debug, Clone)]
#[command(name = "topic-stress")]
#[command(about = "Stream synthetic record batches to HTTP or Kafka topics and measure throughput")]
#[command(long_about = None)]
pub struct Cli {
    /// Path to the TOML config file
    #[arg(short, long, env = "STRESS_CONFIG", default_value = "./stress.toml")]
    pub config: PathBuf,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Directory for the run's log file
    #[arg(long, default_value = ".")]
    pub log_dir: PathBuf,

    /// Log to stderr only
    #[arg(long)]
    pub no_log_file: bool,

    /// Validate the config, print the plan and exit
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    pub fn log_options(&self) -> LogOptions {
        LogOptions {
            level: self.log_level.clone(),
            dir: (!self.no_log_file).then(|| self.log_dir.clone()),
        }
    }
}

/// Human readable description of what a run with `config` will do.
pub fn describe_plan(config: &StressConfig) -> Vec<String> {
    let sizing = config.sizing();
    let stop = match config.stop_condition() {
        StopCondition::Count(n) => format!("{n} batches per topic"),
        StopCondition::Deadline(limit) => format!("{:.1}s deadline", limit.as_secs_f64()),
    };
    let target = match config.transport_method() {
        Ok(TransportMethod::Http) => format!("http {}", config.endpoint),
        Ok(TransportMethod::Kafka) => format!("kafka {}", config.brokers.join(",")),
        Err(e) => e.to_string(),
    };

    let mut lines = vec![
        format!("Topics: {}", config.topics.join(", ")),
        format!("Transport: {target}"),
        format!("Data Format: {}", config.data_format),
        format!("Rows Per Message: {}", config.message_size),
        format!("Stop: {stop}"),
        format!(
            "Workers: {} producer, {} per topic consumer, pipe capacity {}",
            sizing.producer, sizing.consumer, sizing.pipe_capacity
        ),
    ];
    if let Some(total) = config.total_rows() {
        lines.push(format!("Expected Rows Per Topic: {total}"));
    }
    if let Some(interval) = config.flow_interval() {
        lines.push(format!("Flow Interval: {}ms", interval.as_millis()));
    }
    if config.data_format == DataFormat::Avro {
        lines.push(format!("Avro Schema: {}", avro_schema_json()));
    }
    lines
}
