//! Error types for the load pipeline.

use std::path::PathBuf;
use stress_transport::TransportError;
use thiserror::Error;

/// Invalid or unreadable configuration. Always fatal at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Missing required field: topics")]
    MissingTopics,

    #[error("Topic '{0}' is listed more than once")]
    DuplicateTopic(String),

    #[error("threads must be at least 1")]
    ZeroThreads,

    #[error("message_size must be at least 1")]
    ZeroMessageSize,

    #[error("message_num and run_timeout cannot both be greater than 0")]
    ConflictingStopConditions,

    #[error("Either message_num or run_timeout must be greater than 0")]
    NoStopCondition,

    #[error("run_timeout must be between 0 and 525600 minutes, got {0}")]
    InvalidRunTimeout(f64),

    #[error("Unknown method {0}, expected 1 (http) or 2 (kafka)")]
    UnknownMethod(u8),

    #[error("method 2 (kafka) requires at least one entry in brokers")]
    MissingBrokers,

    #[error("method 1 (http) requires an endpoint")]
    MissingEndpoint,
}

/// Errors that stop a run.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Pipeline task failed: {0}")]
    TaskJoin(String),
}

impl From<tokio::task::JoinError> for PipelineError {
    fn from(err: tokio::task::JoinError) -> Self {
        PipelineError::TaskJoin(err.to_string())
    }
}

/// A batch could not be enqueued because the topic's consumer is gone.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Pipe for topic '{0}' is closed")]
pub struct PipeClosed(pub String);
