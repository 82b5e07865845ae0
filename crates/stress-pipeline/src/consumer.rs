//! Per-topic drain of a pipe into a transport handler.

use crate::pipe::PipeReceiver;
use crate::pool::TaskPool;
use crate::stop::{StopCondition, StopSignal};
use chrono::{DateTime, Local};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use stress_transport::{Handler, StatsSender};
use tracing::{debug, info};

/// What one topic's consumer did over a run.
#[derive(Debug, Clone)]
pub struct ConsumerSummary {
    pub topic: String,
    pub batches_sent: u64,
    pub batches_failed: u64,
    pub panicked: u64,
    /// When the consumer's pool fully drained.
    pub finished_at: DateTime<Local>,
}

#[derive(Default)]
struct Counters {
    sent: AtomicU64,
    failed: AtomicU64,
}

pub struct Consumer {
    topic: String,
    pipe: PipeReceiver,
    handler: Arc<dyn Handler>,
    stats: StatsSender,
    pool_size: usize,
}

impl Consumer {
    pub fn new(
        pipe: PipeReceiver,
        handler: Arc<dyn Handler>,
        stats: StatsSender,
        pool_size: usize,
    ) -> Self {
        Self {
            topic: pipe.topic().to_string(),
            pipe,
            handler,
            stats,
            pool_size,
        }
    }

    /// Drain the pipe until `stop` or until it is closed and empty.
    ///
    /// Every dequeued batch produces exactly one outcome on the stats stream.
    /// The pipe receiver is released when this returns.
    pub async fn run(self, stop: StopCondition) -> ConsumerSummary {
        let counters = Arc::new(Counters::default());
        let exhausted = Arc::new(AtomicBool::new(false));
        let mut pool = TaskPool::new(format!("consumer-{}", self.topic), self.pool_size);
        let mut signal = StopSignal::new(stop);

        info!(
            "Consumer for topic '{}' started with {} workers via {}",
            self.topic,
            self.pool_size,
            self.handler.name()
        );

        loop {
            if exhausted.load(Ordering::SeqCst) {
                debug!("Pipe for topic '{}' is closed and drained", self.topic);
                signal.request_stop();
            }
            let Some(slot) = signal.next_slot(&pool).await else {
                break;
            };

            let pipe = self.pipe.clone();
            let handler = self.handler.clone();
            let stats = self.stats.clone();
            let counters = counters.clone();
            let exhausted = exhausted.clone();
            pool.spawn(slot, async move {
                match pipe.dequeue().await {
                    Some(batch) => {
                        if handler.dispatch(batch, &stats).await {
                            counters.sent.fetch_add(1, Ordering::SeqCst);
                        } else {
                            counters.failed.fetch_add(1, Ordering::SeqCst);
                        }
                    }
                    None => exhausted.store(true, Ordering::SeqCst),
                }
            });
        }

        let pool_stats = pool.drain().await;
        let summary = ConsumerSummary {
            topic: self.topic,
            batches_sent: counters.sent.load(Ordering::SeqCst),
            batches_failed: counters.failed.load(Ordering::SeqCst),
            panicked: pool_stats.panicked,
            finished_at: Local::now(),
        };
        info!(
            "Test done for topic '{}': {} sent, {} failed",
            summary.topic, summary.batches_sent, summary.batches_failed
        );
        summary
    }
}
