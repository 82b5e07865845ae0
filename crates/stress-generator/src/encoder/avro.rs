//! Avro binary encoding of flow record batches.
//!
//! A batch is the concatenation of one Avro binary datum per record, written
//! against the record schema returned by [`avro_schema_json`]:
//! - `int` and `long` are zig-zag encoded variable-length integers
//! - `string` and `bytes` are a `long` length followed by the raw bytes
//!
//! No object container header is written; receivers are expected to know the
//! schema out of band.

use crate::error::GeneratorError;
use crate::fields::{FieldValue, FIELDS};
use crate::format::{DataFormat, Serializer};
use crate::record::FlowRecord;
use bytes::Bytes;
use serde_json::json;
use tracing::trace;

/// Avro record name used in the generated schema.
pub const RECORD_NAME: &str = "mpp_bus_pro";

/// Initial per-row buffer reservation, roughly one encoded Avro datum.
const ROW_SIZE_HINT: usize = 384;

/// Build the Avro record schema for [`FlowRecord`] from the field table.
pub fn avro_schema_json() -> serde_json::Value {
    let fields: Vec<serde_json::Value> = FIELDS
        .iter()
        .map(|f| json!({ "name": f.name, "type": f.kind.avro_type() }))
        .collect();

    json!({
        "type": "record",
        "name": RECORD_NAME,
        "fields": fields,
    })
}

/// Append a zig-zag varint encoded `long`.
pub fn write_long(buf: &mut Vec<u8>, n: i64) {
    let mut value = ((n << 1) ^ (n >> 63)) as u64;
    while value >= 0x80 {
        buf.push((value as u8) | 0x80);
        value >>= 7;
    }
    buf.push(value as u8);
}

/// Append a length-prefixed byte sequence.
pub fn write_bytes(buf: &mut Vec<u8>, data: &[u8]) {
    write_long(buf, data.len() as i64);
    buf.extend_from_slice(data);
}

fn write_value(buf: &mut Vec<u8>, value: FieldValue<'_>) {
    match value {
        FieldValue::Int(v) => write_long(buf, v as i64),
        FieldValue::Long(v) => write_long(buf, v),
        FieldValue::Ipv4(v) => write_long(buf, v as i64),
        FieldValue::Ipv6(v) => write_bytes(buf, v),
        FieldValue::Text(v) => write_bytes(buf, v.as_bytes()),
    }
}

/// Encodes batches as concatenated Avro binary datums.
#[derive(Debug, Clone, Copy, Default)]
pub struct AvroSerializer;

impl AvroSerializer {
    pub fn new() -> Self {
        Self
    }

    /// Encode the given records into an Avro binary buffer.
    pub fn encode(&self, records: &[FlowRecord]) -> Vec<u8> {
        let mut buf = Vec::with_capacity(records.len() * ROW_SIZE_HINT);
        for record in records {
            for field in FIELDS.iter() {
                let value = (field.value)(record);
                trace!("Set avro field {}: {:?}", field.name, value);
                write_value(&mut buf, value);
            }
        }
        buf
    }
}

impl Serializer for AvroSerializer {
    fn format(&self) -> DataFormat {
        DataFormat::Avro
    }

    fn serialize(&self, rows: usize) -> Result<Bytes, GeneratorError> {
        let mut rng = rand::thread_rng();
        let records: Vec<FlowRecord> = (0..rows).map(|_| FlowRecord::random(&mut rng)).collect();
        Ok(Bytes::from(self.encode(&records)))
    }
}
