//! The storage seam used by the upload pipeline.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use super::config::{StorageConfig, StorageProvider};
use super::error::StorageError;
use super::gcs::GcsObjectStore;
use super::memory::MemoryObjectStore;

/// A bucket that can receive objects and expose them publicly.
///
/// Implementations are shared read-only across requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Name of the bucket objects are written to.
    fn bucket(&self) -> &str;

    /// Store `content` under `name` in a single request.
    ///
    /// An existing object with the same name is replaced.
    async fn write(&self, name: &str, content: Bytes, content_type: &str)
    -> Result<(), StorageError>;

    /// Make an already written object readable without authentication.
    async fn make_public(&self, name: &str) -> Result<(), StorageError>;

    /// Canonical public URL of `name`.
    fn public_url(&self, name: &str) -> String;
}

/// Build `{base}/{bucket}/{name}`, tolerating a trailing slash on `base`.
#[must_use]
pub fn public_object_url(base: &str, bucket: &str, name: &str) -> String {
    format!("{}/{bucket}/{name}", base.trim_end_matches('/'))
}

/// Create the object store described by `config`.
///
/// # Errors
///
/// Returns an error if the provider cannot be initialized, e.g. the
/// service account key is missing or malformed.
pub fn connect(config: &StorageConfig) -> Result<Arc<dyn ObjectStore>, StorageError> {
    let store: Arc<dyn ObjectStore> = match &config.provider {
        StorageProvider::Gcs {
            bucket,
            credential_path,
            api_base_url,
            ..
        } => Arc::new(GcsObjectStore::new(
            bucket,
            credential_path,
            api_base_url,
            &config.public_base_url,
        )?),
        StorageProvider::Memory { bucket } => {
            Arc::new(MemoryObjectStore::new(bucket, &config.public_base_url)?)
        }
    };
    Ok(store)
}
