//! Encode schemaless quote records as Apache Parquet.
//!
//! Column names and types are inferred from the batch itself: the API sends
//! flat JSON objects, so each key becomes a nullable column typed by the
//! values seen under it. Output is Zstd-compressed and fully in memory.

mod error;
pub(crate) mod schema;
pub(crate) mod builders;
mod writer;


pub use error::ParquetError;
pub use writer::{encode_parquet, records_to_record_batch, PARQUET_CONTENT_TYPE};
