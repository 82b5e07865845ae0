//! End-to-end pipeline runs against the in-memory transport.

use std::sync::Arc;
use std::time::{Duration, Instant};
use stress_pipeline::{Orchestrator, RunOutcome, StressConfig};
use stress_transport::MockFactory;

fn config(extra: &str) -> Arc<StressConfig> {
    Arc::new(
        StressConfig::from_toml_str(&format!(
            r#"
            topics = ["a", "b"]
            message_size = 10
            data_format = "csv"
            endpoint = "127.0.0.1:1"
            {extra}
            "#
        ))
        .unwrap(),
    )
}

async fn run(config: Arc<StressConfig>, factory: MockFactory) -> (RunOutcome, Arc<MockFactory>) {
    let factory = Arc::new(factory);
    let orchestrator = Orchestrator::with_factory(config, factory.clone()).unwrap();
    (orchestrator.run().await.unwrap(), factory)
}

fn assert_report_invariants(outcome: &RunOutcome) {
    for report in &outcome.reports {
        assert_eq!(
            report.total_requests,
            report.success_requests + report.failed_requests
        );
        assert_eq!(report.total_rows, report.success_rows + report.failed_rows);
        assert!(report.bytes_per_second.is_finite() && report.bytes_per_second >= 0.0);
        assert!(report.rows_per_second.is_finite() && report.rows_per_second >= 0.0);
        assert!(report.end_time >= report.start_time);
    }
}

#[tokio::test]
async fn test_fixed_count_all_success() {
    let (outcome, factory) = run(config("message_num = 5\nthreads = 2"), MockFactory::succeeding()).await;

    assert_eq!(outcome.reports.len(), 2);
    for report in &outcome.reports {
        assert_eq!(report.total_rows, 50);
        assert_eq!(report.success_rows, 50);
        assert_eq!(report.failed_rows, 0);
        assert_eq!(report.total_requests, 5);
        assert_eq!(report.success_requests, 5);
        assert_eq!(report.rows_per_batch, 10);
        assert!(report.total_bytes > 0);
    }
    for topic in ["a", "b"] {
        let handler = factory.handler(topic).unwrap();
        assert_eq!(handler.calls(), 5);
        assert_eq!(handler.bytes_received(), outcome.report(topic).unwrap().total_bytes);
    }
    assert_eq!(outcome.producer.batches_produced, 5);
    assert_eq!(outcome.producer.enqueue_dropped, 0);
    assert_report_invariants(&outcome);
}

#[tokio::test]
async fn test_fixed_count_all_failure() {
    let (outcome, _) = run(config("message_num = 5\nthreads = 2"), MockFactory::failing()).await;

    for report in &outcome.reports {
        assert_eq!(report.success_rows, 0);
        assert_eq!(report.failed_rows, 50);
        assert_eq!(report.failed_requests, 5);
        assert_eq!(report.total_bytes, 0);
        assert_eq!(report.bytes_per_second, 0.0);
        assert_eq!(report.rows_per_second, 0.0);
    }
    assert_report_invariants(&outcome);
}

#[tokio::test]
async fn test_every_enqueued_batch_is_dequeued() {
    let factory = MockFactory::succeeding().with_delay(Duration::from_millis(5));
    let (outcome, factory) = run(
        config("message_num = 30\nthreads = 1"),
        factory,
    )
    .await;

    for (topic, enqueued, dequeued) in &outcome.pipes {
        assert_eq!(enqueued, dequeued, "topic {topic}");
        assert_eq!(*enqueued, 30);
        let handler = factory.handler(topic).unwrap();
        assert!(handler.peak_in_flight() <= 1);
    }
    assert_report_invariants(&outcome);
}

#[tokio::test]
async fn test_deadline_run_terminates() {
    let factory = MockFactory::succeeding().with_delay(Duration::from_millis(2));
    let started = Instant::now();
    // 0.005 minutes = 300ms
    let (outcome, _) = run(config("run_timeout = 0.005\nthreads = 2"), factory).await;

    assert!(started.elapsed() < Duration::from_secs(10));
    for report in &outcome.reports {
        assert!(report.total_requests > 0);
        assert_eq!(report.failed_requests, 0);
    }
    assert_report_invariants(&outcome);
}

#[tokio::test]
async fn test_deadline_with_slow_transport_does_not_hang() {
    let factory = MockFactory::succeeding().with_delay(Duration::from_millis(200));
    let started = Instant::now();
    let (outcome, _) = run(config("run_timeout = 0.002\nthreads = 1"), factory).await;

    assert!(started.elapsed() < Duration::from_secs(10));
    for (topic, enqueued, dequeued) in &outcome.pipes {
        assert!(dequeued <= enqueued, "topic {topic}");
    }
    assert_report_invariants(&outcome);
}

#[tokio::test]
async fn test_single_topic_avro() {
    let config = Arc::new(
        StressConfig::from_toml_str(
            r#"
            topics = ["only"]
            threads = 3
            message_size = 25
            message_num = 4
            data_format = "avro"
            endpoint = "127.0.0.1:1"
            "#,
        )
        .unwrap(),
    );
    let (outcome, _) = run(config, MockFactory::succeeding()).await;

    let report = outcome.report("only").unwrap();
    assert_eq!(report.total_rows, 100);
    assert_eq!(report.summary_lines()[3], "Data Format: avro");
    assert_report_invariants(&outcome);
}
