//! The topic-stress load pipeline.
//!
//! One producer pool generates batches and broadcasts each of them to every
//! topic's pipe. Each topic has its own consumer pool that drains the pipe
//! and hands batches to a transport handler. Handlers report outcomes on a
//! shared stats stream, and a single aggregator folds them into one
//! [`Report`] per topic.
//!
//! # Architecture
//!
//! ```text
//!                        ┌──────────────┐
//!                        │   Producer   │  pool of 2 x threads
//!                        └──────┬───────┘
//!              ┌────────────────┼────────────────┐
//!              ▼                ▼                ▼
//!         pipe "a"          pipe "b"   ...   pipe "n"      bounded, backpressure
//!              │                │                │
//!              ▼                ▼                ▼
//!        Consumer "a"     Consumer "b"     Consumer "n"    pool of threads each
//!              │                │                │
//!              └────────── stats stream ─────────┘
//!                               │
//!                               ▼
//!                        ┌──────────────┐
//!                        │  Aggregator  │  single writer of every Report
//!                        └──────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use stress_pipeline::{Orchestrator, StressConfig};
//!
//! let config = StressConfig::from_file("stress.toml")?;
//! let outcome = Orchestrator::new(Arc::new(config))?.run().await?;
//! outcome.print_reports();
//! ```

pub mod aggregator;
pub mod config;
pub mod consumer;
pub mod error;
pub mod orchestrator;
pub mod pipe;
pub mod pool;
pub mod producer;
pub mod report;
pub mod stop;

// Re-exports for convenience
pub use aggregator::Aggregator;
pub use config::{PoolSizing, StressConfig};
pub use consumer::{Consumer, ConsumerSummary};
pub use error::{ConfigError, PipeClosed, PipelineError};
pub use orchestrator::{Orchestrator, RunOutcome};
pub use pipe::{topic_pipe, PipeCounters, PipeReceiver, PipeSender, PipeSet};
pub use pool::{PoolStats, Slot, TaskPool};
pub use producer::{Producer, ProducerSummary};
pub use report::Report;
pub use stop::{StopCondition, StopSignal};
