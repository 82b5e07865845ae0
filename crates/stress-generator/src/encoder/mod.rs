//! Batch encoders, one per supported [`crate::DataFormat`].

pub mod avro;
pub mod csv;
