use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::{Attribute, AttributeValue, ObjectStore, PutOptions, PutPayload, PutResult};
use tracing::{debug, info};

use ptax_core::config::{AwsConfig, BackendKind};
use ptax_core::Config;

use crate::error::StorageError;

/// Unified storage backend wrapping object_store, bound to one bucket.
pub enum StorageBackend {
    Gcs(BucketStore),
    S3(BucketStore),
    Local(LocalBackend),
    Memory(BucketStore),
}

/// A remote (or in-memory) store together with the bucket it points at.
pub struct BucketStore {
    pub store: Arc<dyn ObjectStore>,
    pub bucket: String,
}

impl StorageBackend {
    /// Google Cloud Storage. With `credentials_path` the service-account file
    /// is used; otherwise credentials come from the environment (application
    /// default credentials or the metadata server).
    pub fn gcs(bucket: &str, credentials_path: Option<&Path>) -> Result<Self, StorageError> {
        let mut builder = GoogleCloudStorageBuilder::from_env().with_bucket_name(bucket);
        if let Some(path) = credentials_path {
            builder = builder.with_service_account_path(path.to_string_lossy());
        }
        let store = builder.build()?;

        info!(
            "Storage: GCS backend gs://{} (credentials: {})",
            bucket,
            if credentials_path.is_some() { "service account file" } else { "ambient" }
        );
        Ok(StorageBackend::Gcs(BucketStore {
            store: Arc::new(store),
            bucket: bucket.to_string(),
        }))
    }

    /// Amazon S3 or an S3-compatible endpoint.
    pub fn s3(bucket: &str, aws: &AwsConfig) -> Result<Self, StorageError> {
        let mut builder = AmazonS3Builder::new().with_region(&aws.region);

        if let Some(ref key) = aws.access_key_id {
            builder = builder.with_access_key_id(key);
        }
        if let Some(ref secret) = aws.secret_access_key {
            builder = builder.with_secret_access_key(secret);
        }
        if let Some(ref token) = aws.session_token {
            builder = builder.with_token(token);
        }

        match aws.endpoint_url.as_deref().filter(|e| !e.is_empty()) {
            Some(endpoint) => {
                // object_store requires absolute URLs
                let endpoint_url = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
                    endpoint.to_string()
                } else {
                    format!("https://{}", endpoint)
                };
                builder = builder
                    .with_bucket_name(bucket)
                    .with_endpoint(&endpoint_url)
                    .with_allow_http(endpoint_url.starts_with("http://"));
            }
            None => {
                builder = builder.with_url(format!("s3://{}", bucket));
            }
        }

        let store = builder.build()?;
        info!("Storage: S3 backend s3://{} (region: {})", bucket, aws.region);
        Ok(StorageBackend::S3(BucketStore {
            store: Arc::new(store),
            bucket: bucket.to_string(),
        }))
    }

    /// Local directory `{data_dir}/{bucket}`, created if missing.
    pub fn local(data_dir: &Path, bucket: &str) -> Result<Self, StorageError> {
        Ok(StorageBackend::Local(LocalBackend::new(data_dir, bucket)?))
    }

    /// Process-local store; nothing leaves memory.
    pub fn memory(bucket: &str) -> Self {
        StorageBackend::Memory(BucketStore {
            store: Arc::new(InMemory::new()),
            bucket: bucket.to_string(),
        })
    }

    /// Select the backend configured in `config.storage`, bound to `bucket`.
    pub fn from_config(config: &Config, bucket: &str) -> Result<Self, StorageError> {
        if bucket.is_empty() {
            return Err(StorageError::NotConfigured("bucket name is empty".into()));
        }
        match config.storage.backend {
            BackendKind::Gcs => Self::gcs(bucket, config.storage.credentials_path.as_deref()),
            BackendKind::S3 => Self::s3(bucket, &config.aws),
            BackendKind::Local => Self::local(&config.storage.data_dir, bucket),
            BackendKind::Memory => Ok(Self::memory(bucket)),
        }
    }

    /// Get the underlying ObjectStore.
    pub fn store(&self) -> &dyn ObjectStore {
        match self {
            StorageBackend::Gcs(b) | StorageBackend::S3(b) | StorageBackend::Memory(b) => b.store.as_ref(),
            StorageBackend::Local(b) => b.store.as_ref(),
        }
    }

    pub fn bucket(&self) -> &str {
        match self {
            StorageBackend::Gcs(b) | StorageBackend::S3(b) | StorageBackend::Memory(b) => &b.bucket,
            StorageBackend::Local(b) => &b.bucket,
        }
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            StorageBackend::Gcs(_) => BackendKind::Gcs,
            StorageBackend::S3(_) => BackendKind::S3,
            StorageBackend::Local(_) => BackendKind::Local,
            StorageBackend::Memory(_) => BackendKind::Memory,
        }
    }

    /// Fully-qualified location of `key`, e.g. `gs://bucket/2025/07/01/03.parquet`.
    pub fn uri(&self, key: &str) -> String {
        match self {
            StorageBackend::Gcs(b) => format!("gs://{}/{}", b.bucket, key),
            StorageBackend::S3(b) => format!("s3://{}/{}", b.bucket, key),
            StorageBackend::Memory(b) => format!("memory://{}/{}", b.bucket, key),
            StorageBackend::Local(b) => format!("file://{}", b.root.join(key).display()),
        }
    }

    /// Write one object. The content type is attached as an object attribute
    /// except on the local filesystem, which cannot store attributes.
    pub async fn put_object(
        &self,
        key: &str,
        payload: Vec<u8>,
        content_type: &str,
    ) -> Result<PutResult, StorageError> {
        let path = object_store::path::Path::from(key);
        let mut opts = PutOptions::default();
        if !matches!(self, StorageBackend::Local(_)) {
            opts.attributes
                .insert(Attribute::ContentType, AttributeValue::from(content_type.to_string()));
        }

        let size = payload.len();
        let result = self
            .store()
            .put_opts(&path, PutPayload::from(Bytes::from(payload)), opts)
            .await?;
        debug!(key = %key, bytes = size, backend = %self.kind(), "Stored object");
        Ok(result)
    }
}

/// Local filesystem backend.
pub struct LocalBackend {
    pub store: Arc<dyn ObjectStore>,
    pub bucket: String,
    pub root: PathBuf,
}

impl LocalBackend {
    pub fn new(data_dir: &Path, bucket: &str) -> Result<Self, StorageError> {
        let root = data_dir.join(bucket);
        std::fs::create_dir_all(&root)?;
        let canonical = std::fs::canonicalize(&root).unwrap_or(root);
        let store = LocalFileSystem::new_with_prefix(&canonical)?;
        info!("Storage: local backend at {}", canonical.display());
        Ok(Self {
            store: Arc::new(store),
            bucket: bucket.to_string(),
            root: canonical,
        })
    }
}
