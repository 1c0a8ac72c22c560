//! Storage Uploader: Parquet encoding of quote batches and hourly
//! partitioned writes to object storage.

pub mod backend;
pub mod error;
pub mod parquet;
pub mod uploader;

pub use backend::{BucketStore, LocalBackend, StorageBackend};
pub use error::StorageError;
pub use crate::parquet::{encode_parquet, records_to_record_batch, ParquetError, PARQUET_CONTENT_TYPE};
pub use uploader::{upload_quotes_to_gcs, QuoteUploader};
