//! Run termination.

use crate::pool::{Slot, TaskPool};
use std::pin::Pin;
use std::time::Duration;
use tokio::time::{sleep, Sleep};
use tracing::info;

/// What ends a run. Exactly one applies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StopCondition {
    /// Submit this many batches per pool, then stop.
    Count(u64),
    /// Stop submitting once this much time has passed.
    Deadline(Duration),
}

enum Mode {
    Count { remaining: u64 },
    Deadline { timer: Pin<Box<Sleep>> },
}

/// Gate in front of a pool's submission loop.
///
/// Each loop owns one. In deadline mode the timer starts when the signal is
/// created and waiting for a slot races against it, so a saturated pool
/// cannot hold a loop past its deadline.
pub struct StopSignal {
    mode: Mode,
    stopped: bool,
}

impl StopSignal {
    pub fn new(condition: StopCondition) -> Self {
        let mode = match condition {
            StopCondition::Count(total) => Mode::Count { remaining: total },
            StopCondition::Deadline(limit) => Mode::Deadline {
                // `sleep` saturates instead of overflowing on huge limits.
                timer: Box::pin(sleep(limit)),
            },
        };
        Self {
            mode,
            stopped: false,
        }
    }

    /// Wait for the next slot in `pool`, or `None` once the loop must stop.
    pub async fn next_slot(&mut self, pool: &TaskPool) -> Option<Slot> {
        if self.stopped {
            return None;
        }
        let slot = match &mut self.mode {
            Mode::Count { remaining } => {
                if *remaining == 0 {
                    None
                } else {
                    let slot = pool.reserve().await;
                    if slot.is_some() {
                        *remaining -= 1;
                    }
                    slot
                }
            }
            Mode::Deadline { timer } => {
                tokio::select! {
                    biased;
                    _ = timer.as_mut() => {
                        info!("Run timeout reached, stop submitting");
                        None
                    }
                    slot = pool.reserve() => slot,
                }
            }
        };
        if slot.is_none() {
            self.stopped = true;
        }
        slot
    }

    /// Stop before the condition is met.
    pub fn request_stop(&mut self) {
        self.stopped = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_count_hands_out_exact_slots() {
        let mut pool = TaskPool::new("test", 2);
        let mut signal = StopSignal::new(StopCondition::Count(5));

        let mut granted = 0;
        while let Some(slot) = signal.next_slot(&pool).await {
            pool.spawn(slot, async {});
            granted += 1;
        }
        assert_eq!(granted, 5);
        assert!(signal.is_stopped());
        assert_eq!(pool.drain().await.submitted, 5);
    }

    #[tokio::test]
    async fn test_zero_count_stops_immediately() {
        let pool = TaskPool::new("test", 1);
        let mut signal = StopSignal::new(StopCondition::Count(0));
        assert!(signal.next_slot(&pool).await.is_none());
    }

    #[tokio::test]
    async fn test_deadline_beats_saturated_pool() {
        let mut pool = TaskPool::new("test", 1);
        let mut signal = StopSignal::new(StopCondition::Deadline(Duration::from_millis(50)));

        // Occupy the only slot for far longer than the deadline.
        let slot = signal.next_slot(&pool).await.unwrap();
        pool.spawn(slot, tokio::time::sleep(Duration::from_secs(60)));

        let started = std::time::Instant::now();
        assert!(signal.next_slot(&pool).await.is_none());
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_unbounded_deadline_still_grants_slots() {
        let mut pool = TaskPool::new("test", 1);
        let mut signal = StopSignal::new(StopCondition::Deadline(Duration::MAX));

        let slot = signal.next_slot(&pool).await.unwrap();
        pool.spawn(slot, async {});
        assert!(!signal.is_stopped());
        assert_eq!(pool.drain().await.submitted, 1);
    }

    #[tokio::test]
    async fn test_request_stop() {
        let pool = TaskPool::new("test", 1);
        let mut signal = StopSignal::new(StopCondition::Count(10));
        signal.request_stop();
        assert!(signal.next_slot(&pool).await.is_none());
    }
}
