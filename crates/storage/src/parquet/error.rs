//! Error types for Parquet encoding.

/// Errors that can occur while encoding records to Parquet.
#[derive(Debug, thiserror::Error)]
pub enum ParquetError {
    /// Failed to build Arrow arrays from the records.
    #[error("Arrow conversion error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Failed to write the Parquet buffer.
    #[error("Parquet write error: {0}")]
    Write(#[from] parquet::errors::ParquetError),
}
