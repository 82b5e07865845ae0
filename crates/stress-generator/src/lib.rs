//! Synthetic record generation for topic-stress.
//!
//! This crate produces batches of randomly generated network-flow records and
//! encodes them into one of the supported wire formats. Every call generates
//! fresh values; batches are not reproducible between calls.
//!
//! # Architecture
//!
//! ```text
//!   FlowRecord::random()
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  FIELDS table   │  column name, column kind, accessor
//! └────────┬────────┘
//!          │
//!    ┌─────┴──────┐
//!    ▼            ▼
//! CsvSerializer  AvroSerializer
//!    │            │
//!    └─────┬──────┘
//!          ▼
//!     Bytes (one batch)
//! ```
//!
//! # Example
//!
//! ```rust
//! use stress_generator::DataFormat;
//!
//! let serializer = DataFormat::Csv.serializer();
//! let batch = serializer.serialize(10).unwrap();
//! assert_eq!(batch.iter().filter(|b| **b == b'\n').count(), 10);
//! ```

pub mod encoder;
pub mod error;
pub mod fields;
pub mod format;
pub mod generators;
pub mod record;

// Re-exports for convenience
pub use encoder::avro::{avro_schema_json, AvroSerializer};
pub use encoder::csv::CsvSerializer;
pub use error::GeneratorError;
pub use fields::{ColumnKind, FieldSpec, FieldValue, FIELDS};
pub use format::{DataFormat, Serializer};
pub use record::FlowRecord;
