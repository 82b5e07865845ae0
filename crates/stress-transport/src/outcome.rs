//! Outcome of a single send attempt and the channel that carries it.

use std::time::Duration;
use tokio::sync::mpsc;

/// Sending half of the shared statistics stream.
pub type StatsSender = mpsc::Sender<Statistician>;

/// Receiving half of the shared statistics stream.
pub type StatsReceiver = mpsc::Receiver<Statistician>;

/// Create the bounded statistics stream shared by every handler.
pub fn stats_channel(capacity: usize) -> (StatsSender, StatsReceiver) {
    mpsc::channel(capacity.max(1))
}

/// Outcome of one send attempt.
///
/// Built by a handler right after the send completes and consumed exactly
/// once by the aggregator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statistician {
    /// Topic the batch was sent to.
    pub topic: String,
    /// Whether the destination acknowledged the batch.
    pub success: bool,
    /// Payload bytes delivered, zero on failure.
    pub bytes_sent: u64,
    /// Time from just before the send to the response or acknowledgement.
    pub elapsed: Duration,
}

impl Statistician {
    /// Outcome of an acknowledged send.
    pub fn succeeded(topic: impl Into<String>, bytes_sent: u64, elapsed: Duration) -> Self {
        Self {
            topic: topic.into(),
            success: true,
            bytes_sent,
            elapsed,
        }
    }

    /// Outcome of a failed send. Failed sends never count bytes.
    pub fn failed(topic: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            topic: topic.into(),
            success: false,
            bytes_sent: 0,
            elapsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_ok, assert_pending, assert_ready_ok, task};

    #[test]
    fn test_failed_outcome_has_no_bytes() {
        let stat = Statistician::failed("orders", Duration::from_millis(3));
        assert!(!stat.success);
        assert_eq!(stat.bytes_sent, 0);
        assert_eq!(stat.topic, "orders");
    }

    #[tokio::test]
    async fn test_zero_capacity_channel_is_usable() {
        let (tx, mut rx) = stats_channel(0);
        tx.send(Statistician::succeeded("t", 10, Duration::ZERO))
            .await
            .unwrap();
        drop(tx);

        assert_eq!(rx.recv().await.unwrap().bytes_sent, 10);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_full_stats_stream_holds_sender() {
        let (tx, mut rx) = stats_channel(1);
        assert_ok!(tx.send(Statistician::failed("t", Duration::ZERO)).await);

        let mut blocked = task::spawn(tx.send(Statistician::succeeded("t", 7, Duration::ZERO)));
        assert_pending!(blocked.poll());

        assert!(!rx.recv().await.unwrap().success);
        assert!(blocked.is_woken());
        assert_ready_ok!(blocked.poll());
        assert_eq!(rx.recv().await.unwrap().bytes_sent, 7);
    }
}
