use thiserror::Error;

use crate::parquet::ParquetError;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("No quotes data provided")]
    EmptyInput,

    #[error("object store error: {0}")]
    ObjectStore(#[from] object_store::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parquet error: {0}")]
    Parquet(#[from] ParquetError),

    #[error("not configured: {0}")]
    NotConfigured(String),
}
