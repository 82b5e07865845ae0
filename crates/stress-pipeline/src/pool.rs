//! Bounded worker pool.
//!
//! At most `capacity` tasks run at once. Submitting waits for a free slot,
//! which is how back-pressure reaches the submission loops.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error};

/// A reserved worker slot. Released when the task holding it finishes.
pub type Slot = OwnedSemaphorePermit;

/// Counters reported once a pool has drained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub submitted: u64,
    pub completed: u64,
    pub panicked: u64,
}

pub struct TaskPool {
    name: String,
    capacity: usize,
    semaphore: Arc<Semaphore>,
    tasks: JoinSet<()>,
    stats: PoolStats,
}

impl TaskPool {
    pub fn new(name: impl Into<String>, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            name: name.into(),
            capacity,
            semaphore: Arc::new(Semaphore::new(capacity)),
            tasks: JoinSet::new(),
            stats: PoolStats::default(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Tasks currently holding a slot.
    pub fn in_flight(&self) -> usize {
        self.capacity - self.semaphore.available_permits()
    }

    /// Wait for a free slot. Returns `None` only if the pool was torn down.
    pub async fn reserve(&self) -> Option<Slot> {
        self.semaphore.clone().acquire_owned().await.ok()
    }

    /// Run `task` on a previously reserved slot.
    pub fn spawn<F>(&mut self, slot: Slot, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tasks.spawn(async move {
            task.await;
            drop(slot);
        });
        self.stats.submitted += 1;
        self.reap();
    }

    /// Wait for a slot, then run `task` on it.
    pub async fn submit<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if let Some(slot) = self.reserve().await {
            self.spawn(slot, task);
        }
    }

    /// Collect finished tasks without waiting.
    fn reap(&mut self) {
        while let Some(result) = self.tasks.try_join_next() {
            self.record(result);
        }
    }

    fn record(&mut self, result: Result<(), JoinError>) {
        match result {
            Ok(()) => self.stats.completed += 1,
            Err(e) => {
                self.stats.panicked += 1;
                error!("Worker in pool '{}' failed: {}", self.name, e);
            }
        }
    }

    /// Wait for every submitted task to finish.
    pub async fn drain(mut self) -> PoolStats {
        while let Some(result) = self.tasks.join_next().await {
            self.record(result);
        }
        debug!(
            "Pool '{}' drained: {} submitted, {} completed, {} panicked",
            self.name, self.stats.submitted, self.stats.completed, self.stats.panicked
        );
        self.stats
    }
}
