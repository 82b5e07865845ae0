//! Error types for transport construction.
//!
//! Only handler setup can fail with these errors. Individual sends are
//! reported through [`crate::Statistician`] instead.

use thiserror::Error;

/// Errors that can occur while building a transport handler.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Kafka error: {0}")]
    Kafka(#[from] rdkafka::error::KafkaError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid HTTP endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Unknown transport method {0}, expected 1 (http) or 2 (kafka)")]
    UnknownMethod(u8),

    #[error("No Kafka brokers configured")]
    NoBrokers,
}
