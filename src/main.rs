//! Command-line entry point for topic-stress.
//!
//! ```bash
//! topic-stress --config stress.toml
//! RUST_LOG=stress_pipeline=debug topic-stress --config stress.toml --no-log-file
//! ```

use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use stress_pipeline::{Orchestrator, StressConfig};
use topic_stress::{describe_plan, logging, Cli};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_path = logging::init(&cli.log_options())?;
    if let Some(path) = &log_path {
        info!("Writing log to {}", path.display());
    }

    let config = StressConfig::from_file(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;

    if cli.dry_run {
        for line in describe_plan(&config) {
            println!("{line}");
        }
        return Ok(());
    }

    let orchestrator =
        Orchestrator::new(Arc::new(config)).context("Failed to set up the pipeline")?;
    let outcome = orchestrator.run().await?;
    outcome.print_reports();

    let producer = &outcome.producer;
    if producer.batches_failed > 0 || producer.panicked > 0 {
        tracing::warn!(
            "Producer lost {} batches and {} workers during the run",
            producer.batches_failed,
            producer.panicked
        );
    }
    Ok(())
}
