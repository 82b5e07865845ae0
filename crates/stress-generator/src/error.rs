//! Error types for batch generation.

use thiserror::Error;

/// Errors that can occur while generating or encoding a batch.
#[derive(Error, Debug)]
pub enum GeneratorError {
    /// CSV encoding error.
    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    /// IO error while flushing an encoder.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Data format name not recognised.
    #[error("Unsupported data format '{0}', expected 'csv' or 'avro'")]
    UnsupportedFormat(String),
}
