//! Row-oriented CSV encoding of flow record batches.

use crate::error::GeneratorError;
use crate::fields::FIELDS;
use crate::format::{DataFormat, Serializer};
use crate::record::FlowRecord;
use bytes::Bytes;
use tracing::trace;

/// Initial per-row buffer reservation, roughly one encoded CSV row.
const ROW_SIZE_HINT: usize = 512;

/// Encodes batches as header-less CSV, one record per line.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvSerializer;

impl CsvSerializer {
    pub fn new() -> Self {
        Self
    }

    /// Encode the given records into a CSV buffer.
    pub fn encode(&self, records: &[FlowRecord]) -> Result<Vec<u8>, GeneratorError> {
        let mut writer = ::csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::with_capacity(records.len() * ROW_SIZE_HINT));

        let mut cells = Vec::with_capacity(FIELDS.len());
        for record in records {
            cells.clear();
            for field in FIELDS.iter() {
                let cell = (field.value)(record).to_csv_cell();
                trace!("Set csv column {}: {}", field.name, cell);
                cells.push(cell);
            }
            writer.write_record(&cells)?;
        }

        writer
            .into_inner()
            .map_err(|e| GeneratorError::Io(std::io::Error::other(e.to_string())))
    }
}

impl Serializer for CsvSerializer {
    fn format(&self) -> DataFormat {
        DataFormat::Csv
    }

    fn serialize(&self, rows: usize) -> Result<Bytes, GeneratorError> {
        let mut rng = rand::thread_rng();
        let records: Vec<FlowRecord> = (0..rows).map(|_| FlowRecord::random(&mut rng)).collect();
        Ok(Bytes::from(self.encode(&records)?))
    }
}
