//! Batch generation and fan-out to every topic.

use crate::config::StressConfig;
use crate::pipe::{PipeSender, PipeSet};
use crate::pool::TaskPool;
use crate::stop::{StopCondition, StopSignal};
use bytes::Bytes;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use stress_generator::Serializer;
use tracing::{debug, error, info};

/// What the producer did over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProducerSummary {
    /// Batches generated and offered to the pipes.
    pub batches_produced: u64,
    /// Batches that could not be generated.
    pub batches_failed: u64,
    /// Per-topic enqueues refused because the consumer had already stopped.
    pub enqueue_dropped: u64,
    /// Workers that panicked.
    pub panicked: u64,
    pub duration: Duration,
}

#[derive(Default)]
struct Counters {
    produced: AtomicU64,
    failed: AtomicU64,
    dropped: AtomicU64,
}

pub struct Producer {
    serializer: Arc<dyn Serializer>,
    pipes: PipeSet,
    pool_size: usize,
    rows_per_batch: usize,
    flow_interval: Option<Duration>,
}

impl Producer {
    pub fn new(config: &StressConfig, serializer: Arc<dyn Serializer>, pipes: PipeSet) -> Self {
        Self {
            serializer,
            pipes,
            pool_size: config.sizing().producer,
            rows_per_batch: config.message_size,
            flow_interval: config.flow_interval(),
        }
    }

    /// Generate batches until `stop`, then close every pipe.
    ///
    /// Each batch is serialized once and the same buffer is enqueued on every
    /// topic's pipe, in topic order.
    pub async fn run(self, stop: StopCondition) -> ProducerSummary {
        let started = Instant::now();
        let counters = Arc::new(Counters::default());
        let mut pool = TaskPool::new("producer", self.pool_size);
        let mut signal = StopSignal::new(stop);

        info!(
            "Producer started: {} workers, {} rows per batch, {} topics",
            self.pool_size,
            self.rows_per_batch,
            self.pipes.len()
        );

        while let Some(slot) = signal.next_slot(&pool).await {
            let task = produce_batch(
                self.serializer.clone(),
                self.pipes.shared(),
                self.rows_per_batch,
                counters.clone(),
            );
            pool.spawn(slot, task);

            if let Some(interval) = self.flow_interval {
                tokio::time::sleep(interval).await;
            }
        }

        // Every task handle is dropped once the pool drains.
        let pool_stats = pool.drain().await;
        self.pipes.close();

        let summary = ProducerSummary {
            batches_produced: counters.produced.load(Ordering::SeqCst),
            batches_failed: counters.failed.load(Ordering::SeqCst),
            enqueue_dropped: counters.dropped.load(Ordering::SeqCst),
            panicked: pool_stats.panicked,
            duration: started.elapsed(),
        };
        info!(
            "Producer finished: {} batches in {:.3}s ({} failed, {} dropped enqueues)",
            summary.batches_produced,
            summary.duration.as_secs_f64(),
            summary.batches_failed,
            summary.enqueue_dropped
        );
        summary
    }
}

async fn produce_batch(
    serializer: Arc<dyn Serializer>,
    pipes: Arc<[PipeSender]>,
    rows: usize,
    counters: Arc<Counters>,
) {
    let encoded = tokio::task::spawn_blocking(move || serializer.serialize(rows)).await;
    let batch: Bytes = match encoded {
        Ok(Ok(batch)) => batch,
        Ok(Err(e)) => {
            error!("Failed to serialize batch: {}", e);
            counters.failed.fetch_add(1, Ordering::SeqCst);
            return;
        }
        Err(e) => {
            error!("Serializer task failed: {}", e);
            counters.failed.fetch_add(1, Ordering::SeqCst);
            return;
        }
    };
    counters.produced.fetch_add(1, Ordering::SeqCst);

    for pipe in pipes.iter() {
        offer(pipe, batch.clone(), &counters).await;
    }
}

async fn offer(pipe: &PipeSender, batch: Bytes, counters: &Counters) {
    let len = batch.len();
    match pipe.enqueue(batch).await {
        Ok(()) => debug!("Made {} bytes of data for topic {}", len, pipe.topic()),
        Err(e) => {
            debug!("{}", e);
            counters.dropped.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipe::topic_pipe;
    use stress_generator::{DataFormat, GeneratorError};

    fn config(extra: &str) -> StressConfig {
        StressConfig::from_toml_str(&format!(
            r#"
            topics = ["a", "b"]
            threads = 1
            message_size = 3
            message_num = 4
            data_format = "csv"
            endpoint = "h:1"
            {extra}
            "#
        ))
        .unwrap()
    }

    struct BrokenSerializer;

    impl Serializer for BrokenSerializer {
        fn format(&self) -> DataFormat {
            DataFormat::Csv
        }

        fn serialize(&self, _rows: usize) -> Result<Bytes, GeneratorError> {
            Err(GeneratorError::UnsupportedFormat("broken".to_string()))
        }
    }

    #[tokio::test]
    async fn test_same_batch_reaches_every_topic() {
        let config = config("");
        let (tx_a, rx_a) = topic_pipe("a", 8);
        let (tx_b, rx_b) = topic_pipe("b", 8);
        let producer = Producer::new(
            &config,
            config.data_format.serializer(),
            PipeSet::new(vec![tx_a, tx_b]),
        );

        let summary = producer.run(config.stop_condition()).await;
        assert_eq!(summary.batches_produced, 4);
        assert_eq!(summary.enqueue_dropped, 0);

        let mut from_a = Vec::new();
        while let Some(batch) = rx_a.dequeue().await {
            from_a.push(batch);
        }
        let mut from_b = Vec::new();
        while let Some(batch) = rx_b.dequeue().await {
            from_b.push(batch);
        }
        assert_eq!(from_a.len(), 4);
        assert_eq!(from_b.len(), 4);
        for batch in &from_a {
            assert!(from_b.iter().any(|b| b.as_ptr() == batch.as_ptr()));
            assert_eq!(batch.iter().filter(|&&c| c == b'\n').count(), 3);
        }
    }

    #[tokio::test]
    async fn test_dropped_consumer_does_not_block() {
        let config = config("");
        let (tx, rx) = topic_pipe("a", 1);
        drop(rx);

        let producer = Producer::new(&config, config.data_format.serializer(), PipeSet::new(vec![tx]));
        let summary = producer.run(config.stop_condition()).await;
        assert_eq!(summary.batches_produced, 4);
        assert_eq!(summary.enqueue_dropped, 4);
    }

    #[tokio::test]
    async fn test_serializer_failure_is_counted() {
        let config = config("");
        let (tx, rx) = topic_pipe("a", 8);
        let producer = Producer::new(&config, Arc::new(BrokenSerializer), PipeSet::new(vec![tx]));

        let summary = producer.run(config.stop_condition()).await;
        assert_eq!(summary.batches_failed, 4);
        assert_eq!(summary.batches_produced, 0);
        assert!(rx.dequeue().await.is_none());
    }

    #[tokio::test]
    async fn test_flow_control_spaces_submissions() {
        let config = config("flow_control = true\nflow_interval_ms = 10");
        let (tx, _rx) = topic_pipe("a", 8);
        let producer = Producer::new(&config, config.data_format.serializer(), PipeSet::new(vec![tx]));

        let summary = producer.run(config.stop_condition()).await;
        assert!(summary.duration >= Duration::from_millis(40));
    }
}
