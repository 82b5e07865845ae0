//! Kafka transport: one message per batch.

use crate::error::TransportError;
use crate::factory::TransportSettings;
use crate::handler::Handler;
use crate::outcome::Statistician;
use async_trait::async_trait;
use bytes::Bytes;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::ClientConfig;
use std::time::{Duration, Instant};
use tracing::{debug, error};

/// Key attached to every batch message.
pub const MESSAGE_KEY: &str = "1";

/// Largest batch message the producer accepts, in bytes (30 MiB).
pub const MAX_MESSAGE_BYTES: usize = 30 * 1024 * 1024;

/// Publishes batches to a Kafka topic.
///
/// One producer is created per topic and shared by that topic's consumer
/// tasks; librdkafka handles broker connections and partition balancing.
pub struct KafkaHandler {
    producer: FutureProducer,
    topic: String,
    timeout: Duration,
}

impl KafkaHandler {
    /// Create a producer for `topic` against the configured brokers.
    pub fn new(topic: &str, settings: &TransportSettings) -> Result<Self, TransportError> {
        if settings.brokers.is_empty() {
            return Err(TransportError::NoBrokers);
        }

        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", settings.brokers.join(","))
            .set(
                "message.timeout.ms",
                settings.request_timeout.as_millis().to_string(),
            )
            .set("message.max.bytes", MAX_MESSAGE_BYTES.to_string())
            .set("queue.buffering.max.kbytes", "1048576")
            .set("linger.ms", "5")
            .create()?;

        debug!(
            "Created Kafka producer for topic '{}' (brokers: {})",
            topic,
            settings.brokers.join(",")
        );

        Ok(Self {
            producer,
            topic: topic.to_string(),
            timeout: settings.request_timeout,
        })
    }
}

#[async_trait]
impl Handler for KafkaHandler {
    fn name(&self) -> &'static str {
        "kafka"
    }

    fn topic(&self) -> &str {
        &self.topic
    }

    async fn send(&self, batch: Bytes) -> Statistician {
        let record = FutureRecord::to(&self.topic)
            .key(MESSAGE_KEY)
            .payload(&batch[..]);

        let start = Instant::now();
        let result = self.producer.send(record, self.timeout).await;
        let elapsed = start.elapsed();

        match result {
            Ok(_) => Statistician::succeeded(&self.topic, batch.len() as u64, elapsed),
            Err((err, _)) => {
                error!("Sent message to kafka topic '{}' with error: {}", self.topic, err);
                Statistician::failed(&self.topic, elapsed)
            }
        }
    }
}
