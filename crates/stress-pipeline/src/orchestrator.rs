//! Wiring and ordered shutdown of a whole run.

use crate::aggregator::Aggregator;
use crate::config::StressConfig;
use crate::consumer::{Consumer, ConsumerSummary};
use crate::error::PipelineError;
use crate::pipe::{topic_pipe, PipeCounters, PipeSet};
use crate::producer::{Producer, ProducerSummary};
use crate::report::Report;
use std::collections::HashMap;
use std::sync::Arc;
use stress_generator::Serializer;
use stress_transport::{stats_channel, Handler, HandlerFactory, TransportFactory};
use tokio::task::JoinSet;
use tracing::{debug, info};

/// Everything a finished run produced.
#[derive(Debug)]
pub struct RunOutcome {
    /// One report per topic, in configured topic order.
    pub reports: Vec<Report>,
    pub producer: ProducerSummary,
    /// One summary per topic, in configured topic order.
    pub consumers: Vec<ConsumerSummary>,
    /// Enqueued and dequeued batch counts per topic, in configured order.
    pub pipes: Vec<(String, u64, u64)>,
}

impl RunOutcome {
    pub fn report(&self, topic: &str) -> Option<&Report> {
        self.reports.iter().find(|r| r.name == topic)
    }

    pub fn print_reports(&self) {
        for report in &self.reports {
            report.print();
        }
    }
}

pub struct Orchestrator {
    config: Arc<StressConfig>,
    factory: Arc<dyn HandlerFactory>,
    serializer: Arc<dyn Serializer>,
}

impl Orchestrator {
    /// Build an orchestrator using the configured real transport.
    pub fn new(config: Arc<StressConfig>) -> Result<Self, PipelineError> {
        config.validate()?;
        let factory = TransportFactory::new(config.transport_settings()?);
        Self::with_factory(config, Arc::new(factory))
    }

    /// Build an orchestrator with a caller-supplied handler factory.
    pub fn with_factory(
        config: Arc<StressConfig>,
        factory: Arc<dyn HandlerFactory>,
    ) -> Result<Self, PipelineError> {
        config.validate()?;
        let serializer = config.data_format.serializer();
        Ok(Self {
            config,
            factory,
            serializer,
        })
    }

    pub fn config(&self) -> &StressConfig {
        &self.config
    }

    /// Run the pipeline to completion.
    ///
    /// Shutdown order: consumers finish (releasing their pipes), the stats
    /// stream closes so the aggregator returns, then the producer is joined.
    pub async fn run(&self) -> Result<RunOutcome, PipelineError> {
        let config = &self.config;
        let sizing = config.sizing();
        let stop = config.stop_condition();

        // Every handler is built before anything starts, so a bad transport
        // fails the run without side effects.
        let mut handlers: Vec<Arc<dyn Handler>> = Vec::with_capacity(config.topics.len());
        for topic in &config.topics {
            handlers.push(self.factory.handler_for(topic)?);
        }

        info!(
            "Starting run: {} topics, {} threads, {:?}, format {}",
            config.topics.len(),
            config.threads,
            stop,
            config.data_format
        );

        let reports: Vec<Report> = config
            .topics
            .iter()
            .map(|topic| Report::new(topic, config))
            .collect();
        let (stats_tx, stats_rx) = stats_channel(sizing.stats_capacity);
        let aggregator = Aggregator::new(reports).spawn(stats_rx);

        let mut senders = Vec::with_capacity(config.topics.len());
        let mut receivers = Vec::with_capacity(config.topics.len());
        let mut counters: Vec<(String, Arc<PipeCounters>)> = Vec::new();
        for topic in &config.topics {
            let (tx, rx) = topic_pipe(topic.as_str(), sizing.pipe_capacity);
            counters.push((topic.clone(), tx.counters()));
            senders.push(tx);
            receivers.push(rx);
        }

        let producer = Producer::new(config, self.serializer.clone(), PipeSet::new(senders));
        let producer = tokio::spawn(producer.run(stop));

        let mut consumers = JoinSet::new();
        for (rx, handler) in receivers.into_iter().zip(handlers) {
            let consumer = Consumer::new(rx, handler, stats_tx.clone(), sizing.consumer);
            consumers.spawn(consumer.run(stop));
        }

        let mut summaries: HashMap<String, ConsumerSummary> = HashMap::new();
        while let Some(joined) = consumers.join_next().await {
            let summary = joined?;
            summaries.insert(summary.topic.clone(), summary);
        }
        info!("Test done for all topics");

        drop(stats_tx);
        let mut by_topic = aggregator.await?;
        let producer = producer.await?;
        debug!("Producer joined after {:.3}s", producer.duration.as_secs_f64());

        let mut reports = Vec::with_capacity(config.topics.len());
        let mut consumer_summaries = Vec::with_capacity(config.topics.len());
        for topic in &config.topics {
            let summary = summaries.remove(topic);
            if let Some(mut report) = by_topic.remove(topic) {
                if let Some(summary) = &summary {
                    report.finish(summary.finished_at);
                }
                reports.push(report);
            }
            consumer_summaries.extend(summary);
        }

        Ok(RunOutcome {
            reports,
            producer,
            consumers: consumer_summaries,
            pipes: counters
                .into_iter()
                .map(|(topic, c)| (topic, c.enqueued(), c.dequeued()))
                .collect(),
        })
    }
}
