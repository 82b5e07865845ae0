//! Single consumer of the stats stream.

use crate::report::Report;
use std::collections::HashMap;
use stress_transport::{Statistician, StatsReceiver};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Owns every topic's [`Report`] for the duration of a run.
pub struct Aggregator {
    reports: HashMap<String, Report>,
    received: u64,
}

impl Aggregator {
    pub fn new(reports: impl IntoIterator<Item = Report>) -> Self {
        Self {
            reports: reports
                .into_iter()
                .map(|report| (report.name.clone(), report))
                .collect(),
            received: 0,
        }
    }

    /// Apply one outcome to its topic's report.
    pub fn apply(&mut self, stat: &Statistician) {
        self.received += 1;
        match self.reports.get_mut(&stat.topic) {
            Some(report) => report.record(stat),
            None => warn!("Dropping outcome for unknown topic '{}'", stat.topic),
        }
    }

    /// Consume outcomes until every sender is gone, then hand back the reports.
    pub async fn run(mut self, mut stats: StatsReceiver) -> HashMap<String, Report> {
        while let Some(stat) = stats.recv().await {
            self.apply(&stat);
        }
        debug!("Stats stream closed after {} outcomes", self.received);
        self.reports
    }

    pub fn spawn(self, stats: StatsReceiver) -> JoinHandle<HashMap<String, Report>> {
        tokio::spawn(self.run(stats))
    }
}
