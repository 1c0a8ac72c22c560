use std::path::Path;
use std::time::Instant;

use chrono::{Datelike, Local, Timelike};
use ptax_core::{PartitionPath, QuoteRecord};
use tracing::{debug, error, info};

use crate::backend::StorageBackend;
use crate::error::StorageError;
use crate::parquet::{encode_parquet, PARQUET_CONTENT_TYPE};

/// Writes quote batches as hourly Parquet partitions into one bucket.
pub struct QuoteUploader {
    backend: StorageBackend,
    prefix: Option<String>,
}

impl QuoteUploader {
    pub fn new(backend: StorageBackend) -> Self {
        Self { backend, prefix: None }
    }

    /// Nest every partition under `prefix` (e.g. `raw/ptax`).
    pub fn with_prefix(mut self, prefix: Option<String>) -> Self {
        self.prefix = prefix
            .map(|p| p.trim_matches('/').to_string())
            .filter(|p| !p.is_empty());
        self
    }

    pub fn backend(&self) -> &StorageBackend {
        &self.backend
    }

    /// Object key the batch for `timestamp` lands on.
    pub fn object_key<T: Datelike + Timelike>(&self, timestamp: &T) -> String {
        PartitionPath::from_timestamp(timestamp).key(self.prefix.as_deref())
    }

    /// Serialize `quotes` to Parquet and store them under the partition for
    /// `timestamp`. Returns the fully-qualified destination, e.g.
    /// `gs://bucket/2025/07/01/03.parquet`.
    ///
    /// An empty batch is rejected before the backend is touched. Every other
    /// failure is logged and returned.
    pub async fn upload_quotes<T: Datelike + Timelike>(
        &self,
        quotes: &[QuoteRecord],
        timestamp: &T,
    ) -> Result<String, StorageError> {
        if quotes.is_empty() {
            return Err(StorageError::EmptyInput);
        }

        let key = self.object_key(timestamp);
        let result = self.write(quotes, &key).await;

        match &result {
            Ok(uri) => info!(quotes = quotes.len(), path = %uri, "Successfully uploaded quotes"),
            Err(e) => error!(
                error = %e,
                backend = %self.backend.kind(),
                bucket = %self.backend.bucket(),
                "Failed to upload quotes"
            ),
        }
        result
    }

    /// [`QuoteUploader::upload_quotes`] partitioned by the current local time.
    pub async fn upload_quotes_now(&self, quotes: &[QuoteRecord]) -> Result<String, StorageError> {
        self.upload_quotes(quotes, &Local::now()).await
    }

    async fn write(&self, quotes: &[QuoteRecord], key: &str) -> Result<String, StorageError> {
        let started = Instant::now();
        let payload = encode_parquet(quotes)?;
        let size = payload.len();

        self.backend.put_object(key, payload, PARQUET_CONTENT_TYPE).await?;

        let uri = self.backend.uri(key);
        debug!(
            bytes = size,
            "Wrote {} in {:.2}s",
            uri,
            started.elapsed().as_secs_f64()
        );
        Ok(uri)
    }
}

/// Upload `quotes` to a GCS bucket in one call, optionally authenticating
/// with a service-account file instead of ambient credentials.
pub async fn upload_quotes_to_gcs<T: Datelike + Timelike>(
    bucket: &str,
    quotes: &[QuoteRecord],
    timestamp: &T,
    credentials_path: Option<&Path>,
) -> Result<String, StorageError> {
    if quotes.is_empty() {
        return Err(StorageError::EmptyInput);
    }
    let backend = StorageBackend::gcs(bucket, credentials_path).inspect_err(|e| {
        error!(error = %e, bucket = %bucket, "Failed to create GCS client");
    })?;
    QuoteUploader::new(backend).upload_quotes(quotes, timestamp).await
}
