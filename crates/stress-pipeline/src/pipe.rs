//! Bounded per-topic batch queues.
//!
//! The producer holds every [`PipeSender`] through a [`PipeSet`] and closes
//! them all at once when it finishes. Each topic's consumer holds the single
//! [`PipeReceiver`] for its pipe; its workers share it and dequeue one at a
//! time. Dropping the receiver makes further enqueues fail fast.

use crate::error::PipeClosed;
use bytes::Bytes;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, warn};

/// Batches that went in and came out of one pipe.
#[derive(Debug, Default)]
pub struct PipeCounters {
    enqueued: AtomicU64,
    dequeued: AtomicU64,
}

impl PipeCounters {
    pub fn enqueued(&self) -> u64 {
        self.enqueued.load(Ordering::SeqCst)
    }

    pub fn dequeued(&self) -> u64 {
        self.dequeued.load(Ordering::SeqCst)
    }
}

/// Create the pipe for `topic` holding at most `capacity` batches.
pub fn topic_pipe(topic: impl Into<String>, capacity: usize) -> (PipeSender, PipeReceiver) {
    let topic: Arc<str> = Arc::from(topic.into());
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let counters = Arc::new(PipeCounters::default());

    let sender = PipeSender {
        topic: topic.clone(),
        tx,
        counters: counters.clone(),
    };
    let receiver = PipeReceiver {
        topic,
        rx: Arc::new(Mutex::new(rx)),
        counters,
    };
    (sender, receiver)
}

#[derive(Debug, Clone)]
pub struct PipeSender {
    topic: Arc<str>,
    tx: mpsc::Sender<Bytes>,
    counters: Arc<PipeCounters>,
}

impl PipeSender {
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Enqueue a batch, waiting while the pipe is full.
    pub async fn enqueue(&self, batch: Bytes) -> Result<(), PipeClosed> {
        self.tx
            .send(batch)
            .await
            .map_err(|_| PipeClosed(self.topic.to_string()))?;
        self.counters.enqueued.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    pub fn counters(&self) -> Arc<PipeCounters> {
        self.counters.clone()
    }
}

/// Shared consuming end of a pipe.
#[derive(Debug, Clone)]
pub struct PipeReceiver {
    topic: Arc<str>,
    rx: Arc<Mutex<mpsc::Receiver<Bytes>>>,
    counters: Arc<PipeCounters>,
}

impl PipeReceiver {
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Take the next batch. `None` once the pipe is closed and empty.
    pub async fn dequeue(&self) -> Option<Bytes> {
        let batch = self.rx.lock().await.recv().await;
        if batch.is_some() {
            self.counters.dequeued.fetch_add(1, Ordering::SeqCst);
        }
        batch
    }

    pub fn counters(&self) -> Arc<PipeCounters> {
        self.counters.clone()
    }
}

/// Every topic's sending end, in topic order.
///
/// Owned by the producer. Tasks borrow the senders through [`PipeSet::shared`].
#[derive(Debug)]
pub struct PipeSet {
    senders: Arc<[PipeSender]>,
}

impl PipeSet {
    pub fn new(senders: Vec<PipeSender>) -> Self {
        Self {
            senders: senders.into(),
        }
    }

    pub fn senders(&self) -> &[PipeSender] {
        &self.senders
    }

    /// Sender handle for a spawned task. Pipes stay open while any of these
    /// is alive.
    pub fn shared(&self) -> Arc<[PipeSender]> {
        self.senders.clone()
    }

    pub fn len(&self) -> usize {
        self.senders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }

    /// Release the set's senders. Consumers see end-of-stream once every
    /// handle from [`PipeSet::shared`] is gone too and they drain what is
    /// left, so callers drain their tasks first.
    pub fn close(self) {
        let outstanding = Arc::strong_count(&self.senders) - 1;
        if outstanding > 0 {
            warn!(
                "Closing {} topic pipes with {} task handles still alive",
                self.senders.len(),
                outstanding
            );
        } else {
            debug!("Closing {} topic pipes", self.senders.len());
        }
        drop(self.senders);
    }
}
