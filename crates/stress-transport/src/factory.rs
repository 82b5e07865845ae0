//! Building one handler per topic.

use crate::error::TransportError;
use crate::handler::Handler;
use crate::http::HttpHandler;
use crate::kafka::KafkaHandler;
use crate::method::TransportMethod;
use std::sync::Arc;
use std::time::Duration;
use stress_generator::DataFormat;
use tracing::info;

/// Everything a transport needs to reach its destination.
#[derive(Debug, Clone)]
pub struct TransportSettings {
    /// Selected transport.
    pub method: TransportMethod,
    /// Format of the batches being sent.
    pub data_format: DataFormat,
    /// HTTP `host:port` of the data-load service.
    pub endpoint: String,
    /// HTTP user header.
    pub user: String,
    /// HTTP password header.
    pub password: String,
    /// Kafka bootstrap servers.
    pub brokers: Vec<String>,
    /// Per-request timeout.
    pub request_timeout: Duration,
}

/// Creates the handler a topic's consumer will use.
pub trait HandlerFactory: Send + Sync {
    fn handler_for(&self, topic: &str) -> Result<Arc<dyn Handler>, TransportError>;
}

/// Factory for the configured real transport.
#[derive(Debug, Clone)]
pub struct TransportFactory {
    settings: TransportSettings,
}

impl TransportFactory {
    pub fn new(settings: TransportSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &TransportSettings {
        &self.settings
    }
}

impl HandlerFactory for TransportFactory {
    fn handler_for(&self, topic: &str) -> Result<Arc<dyn Handler>, TransportError> {
        let handler: Arc<dyn Handler> = match self.settings.method {
            TransportMethod::Http => Arc::new(HttpHandler::new(topic, &self.settings)?),
            TransportMethod::Kafka => Arc::new(KafkaHandler::new(topic, &self.settings)?),
        };
        info!(
            "Using {} transport for topic '{}'",
            self.settings.method, topic
        );
        Ok(handler)
    }
}
