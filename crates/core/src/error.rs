use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CoreError {
    #[error("Unknown response format: {0} (expected json or xml)")]
    UnknownFormat(String),

    #[error("Unknown storage backend: {0} (expected gcs, s3, local or memory)")]
    UnknownBackend(String),
}
