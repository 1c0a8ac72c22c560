//! Public API for turning a quote batch into Parquet bytes.

use std::sync::Arc;

use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use ptax_core::QuoteRecord;
use tracing::debug;

use super::builders::build_arrays;
use super::error::ParquetError;
use super::schema::{build_schema, infer_columns};

/// Content type used when the Parquet payload is written to object storage.
pub const PARQUET_CONTENT_TYPE: &str = "application/octet-stream";

/// Convert records into a single Arrow [`RecordBatch`] with an inferred schema.
pub fn records_to_record_batch(records: &[QuoteRecord]) -> Result<RecordBatch, ParquetError> {
    let columns = infer_columns(records);
    let schema = Arc::new(build_schema(&columns));
    let arrays = build_arrays(records, &columns);
    let options = RecordBatchOptions::new().with_row_count(Some(records.len()));
    Ok(RecordBatch::try_new_with_options(schema, arrays, &options)?)
}

/// Encode records as an in-memory Parquet file.
///
/// Uses Zstd compression and stores the row count and writer name as
/// key-value metadata in the file footer.
pub fn encode_parquet(records: &[QuoteRecord]) -> Result<Vec<u8>, ParquetError> {
    let batch = records_to_record_batch(records)?;

    let props = WriterProperties::builder()
        .set_compression(Compression::ZSTD(Default::default()))
        .set_key_value_metadata(Some(vec![
            parquet::format::KeyValue::new("ptax.row_count".to_string(), Some(batch.num_rows().to_string())),
            parquet::format::KeyValue::new(
                "ptax.writer".to_string(),
                Some(concat!("ptax-storage/", env!("CARGO_PKG_VERSION")).to_string()),
            ),
        ]))
        .build();

    let mut buf = Vec::new();
    let mut writer = ArrowWriter::try_new(&mut buf, batch.schema(), Some(props))?;
    writer.write(&batch)?;
    writer.close()?;

    debug!(
        rows = batch.num_rows(),
        columns = batch.num_columns(),
        bytes = buf.len(),
        "Encoded Parquet buffer"
    );

    Ok(buf)
}
