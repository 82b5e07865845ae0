//! The transport capability used by consumers.

use crate::outcome::{Statistician, StatsSender};
use async_trait::async_trait;
use bytes::Bytes;
use tracing::warn;

/// Sends encoded batches to one topic.
///
/// A handler is built once per topic and shared by all of that topic's
/// consumer tasks, so implementations must tolerate concurrent calls.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Short transport name for logs.
    fn name(&self) -> &'static str;

    /// Topic this handler delivers to.
    fn topic(&self) -> &str;

    /// Send one batch and describe the outcome.
    ///
    /// Never fails: transport errors are logged and reported as a failed
    /// [`Statistician`].
    async fn send(&self, batch: Bytes) -> Statistician;

    /// Send one batch and push exactly one outcome onto the stats stream.
    ///
    /// Returns whether the send succeeded.
    async fn dispatch(&self, batch: Bytes, stats: &StatsSender) -> bool {
        let outcome = self.send(batch).await;
        let success = outcome.success;
        if stats.send(outcome).await.is_err() {
            warn!(
                "Stats stream closed, dropping {} outcome for topic '{}'",
                self.name(),
                self.topic()
            );
        }
        success
    }
}
