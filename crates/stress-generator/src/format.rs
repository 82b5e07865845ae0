//! Supported batch formats and the serializer capability.

use crate::encoder::avro::AvroSerializer;
use crate::encoder::csv::CsvSerializer;
use crate::error::GeneratorError;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Produces one encoded batch of freshly generated records.
///
/// Implementations must be safe to call from many producer tasks at once.
pub trait Serializer: Send + Sync {
    /// The format this serializer writes.
    fn format(&self) -> DataFormat;

    /// Generate `rows` random records and encode them as one batch.
    fn serialize(&self, rows: usize) -> Result<Bytes, GeneratorError>;
}

/// Wire format of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum DataFormat {
    /// Comma separated rows.
    Csv,
    /// Avro binary datums.
    Avro,
}

impl DataFormat {
    /// Build the serializer for this format.
    pub fn serializer(&self) -> Arc<dyn Serializer> {
        match self {
            DataFormat::Csv => Arc::new(CsvSerializer::new()),
            DataFormat::Avro => Arc::new(AvroSerializer::new()),
        }
    }

    /// MIME type sent with HTTP uploads.
    pub fn content_type(&self) -> &'static str {
        match self {
            DataFormat::Csv => "text/csv",
            DataFormat::Avro => "application/avro",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DataFormat::Csv => "csv",
            DataFormat::Avro => "avro",
        }
    }
}

impl std::fmt::Display for DataFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DataFormat {
    type Err = GeneratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "csv" => Ok(DataFormat::Csv),
            "avro" => Ok(DataFormat::Avro),
            other => Err(GeneratorError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl TryFrom<String> for DataFormat {
    type Error = GeneratorError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}
