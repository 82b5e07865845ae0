//! In-memory transport for tests and dry runs.

use crate::error::TransportError;
use crate::factory::HandlerFactory;
use crate::handler::Handler;
use crate::outcome::Statistician;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::time::sleep;

/// Handler that answers every batch with a fixed outcome after an optional
/// delay, and counts what it saw.
#[derive(Debug)]
pub struct MockHandler {
    topic: String,
    succeed: bool,
    delay: Duration,
    calls: AtomicU64,
    bytes: AtomicU64,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl MockHandler {
    /// A handler that acknowledges every batch.
    pub fn succeeding(topic: impl Into<String>) -> Self {
        Self::new(topic, true)
    }

    /// A handler that rejects every batch.
    pub fn failing(topic: impl Into<String>) -> Self {
        Self::new(topic, false)
    }

    fn new(topic: impl Into<String>, succeed: bool) -> Self {
        Self {
            topic: topic.into(),
            succeed,
            delay: Duration::ZERO,
            calls: AtomicU64::new(0),
            bytes: AtomicU64::new(0),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    /// Wait this long inside every send.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of batches received.
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Total payload bytes received.
    pub fn bytes_received(&self) -> u64 {
        self.bytes.load(Ordering::SeqCst)
    }

    /// Highest number of sends observed running at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Handler for MockHandler {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn topic(&self) -> &str {
        &self.topic
    }

    async fn send(&self, batch: Bytes) -> Statistician {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        let start = Instant::now();
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.bytes.fetch_add(batch.len() as u64, Ordering::SeqCst);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.succeed {
            Statistician::succeeded(&self.topic, batch.len() as u64, start.elapsed())
        } else {
            Statistician::failed(&self.topic, start.elapsed())
        }
    }
}

/// Factory handing out one [`MockHandler`] per topic and keeping them for
/// later inspection.
#[derive(Debug)]
pub struct MockFactory {
    succeed: bool,
    delay: Duration,
    handlers: Mutex<HashMap<String, Arc<MockHandler>>>,
}

impl MockFactory {
    pub fn succeeding() -> Self {
        Self::new(true)
    }

    pub fn failing() -> Self {
        Self::new(false)
    }

    fn new(succeed: bool) -> Self {
        Self {
            succeed,
            delay: Duration::ZERO,
            handlers: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// The handler created for `topic`, if any.
    pub fn handler(&self, topic: &str) -> Option<Arc<MockHandler>> {
        self.handlers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(topic)
            .cloned()
    }
}

impl HandlerFactory for MockFactory {
    fn handler_for(&self, topic: &str) -> Result<Arc<dyn Handler>, TransportError> {
        let handler = Arc::new(MockHandler::new(topic, self.succeed).with_delay(self.delay));
        self.handlers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(topic.to_string(), handler.clone());
        Ok(handler)
    }
}
