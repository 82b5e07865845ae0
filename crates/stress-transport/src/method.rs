//! Transport selection.

use crate::error::TransportError;

/// Which transport carries batches to their topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMethod {
    /// HTTP `POST` to a data-load endpoint.
    Http,
    /// Kafka producer.
    Kafka,
}

impl TransportMethod {
    pub fn name(&self) -> &'static str {
        match self {
            TransportMethod::Http => "http",
            TransportMethod::Kafka => "kafka",
        }
    }
}

impl TryFrom<u8> for TransportMethod {
    type Error = TransportError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(TransportMethod::Http),
            2 => Ok(TransportMethod::Kafka),
            other => Err(TransportError::UnknownMethod(other)),
        }
    }
}

impl std::fmt::Display for TransportMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
