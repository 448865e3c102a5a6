//! In-process object store for development and tests.

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashSet;
use opendal::{Operator, services};

use super::error::StorageError;
use super::store::{ObjectStore, public_object_url};

/// Memory-backed bucket. Contents vanish with the process.
pub struct MemoryObjectStore {
    operator: Operator,
    bucket: String,
    public_base_url: String,
    published: DashSet<String>,
}

impl MemoryObjectStore {
    /// Create an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if the memory operator cannot be built.
    pub fn new(bucket: &str, public_base_url: &str) -> Result<Self, StorageError> {
        let operator = Operator::new(services::Memory::default())
            .map_err(|e| StorageError::configuration(e.to_string()))?
            .finish();

        Ok(Self {
            operator,
            bucket: bucket.to_string(),
            public_base_url: public_base_url.to_string(),
            published: DashSet::new(),
        })
    }

    /// Read back a stored object.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if nothing was written under `name`.
    pub async fn read(&self, name: &str) -> Result<Bytes, StorageError> {
        Ok(self.operator.read(name).await?.to_bytes())
    }

    /// Check whether an object exists.
    pub async fn exists(&self, name: &str) -> bool {
        self.operator.stat(name).await.is_ok()
    }

    /// Check whether `name` has been made public.
    #[must_use]
    pub fn is_public(&self, name: &str) -> bool {
        self.published.contains(name)
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn write(
        &self,
        name: &str,
        content: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.operator
            .write_with(name, content)
            .content_type(content_type)
            .await?;
        Ok(())
    }

    async fn make_public(&self, name: &str) -> Result<(), StorageError> {
        if !self.exists(name).await {
            return Err(StorageError::not_found(name));
        }
        self.published.insert(name.to_string());
        Ok(())
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn public_url(&self, name: &str) -> String {
        public_object_url(&self.public_base_url, &self.bucket, name)
    }
}
