//! Transport handlers for topic-stress.
//!
//! A [`Handler`] takes one encoded batch, sends it to its topic and reports
//! the outcome as a [`Statistician`]. Failures never escape a handler: they
//! are logged and turned into a failed outcome, so the pipeline keeps going.
//!
//! Two concrete transports are provided:
//!
//! - [`HttpHandler`] - `POST`s each batch to a data-load HTTP endpoint
//! - [`KafkaHandler`] - publishes each batch as one Kafka message
//!
//! The pipeline never names a concrete transport. It asks a
//! [`HandlerFactory`] for one handler per topic and only talks to the trait.

pub mod error;
pub mod factory;
pub mod handler;
pub mod http;
pub mod kafka;
pub mod method;
pub mod mock;
pub mod outcome;

// Re-exports for convenience
pub use error::TransportError;
pub use factory::{HandlerFactory, TransportFactory, TransportSettings};
pub use handler::Handler;
pub use http::HttpHandler;
pub use kafka::KafkaHandler;
pub use method::TransportMethod;
pub use mock::{MockFactory, MockHandler};
pub use outcome::{stats_channel, Statistician, StatsReceiver, StatsSender};
