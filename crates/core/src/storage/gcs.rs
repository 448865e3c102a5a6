//! Google Cloud Storage backend.

use std::io::Write;
use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;
use flate2::{Compression, write::GzEncoder};
use opendal::{Operator, services};
use reqwest::Url;
use serde_json::json;

use super::error::StorageError;
use super::store::{ObjectStore, public_object_url};
use super::token::TokenProvider;

/// Objects are stored gzip-compressed and served with this encoding.
const CONTENT_ENCODING: &str = "gzip";

/// Google Cloud Storage bucket.
///
/// Writes go through an `opendal` GCS operator as one non-resumable,
/// gzip-compressed request. Publishing adds an `allUsers: READER` entry to
/// the object's ACL via the JSON API.
pub struct GcsObjectStore {
    operator: Operator,
    http: reqwest::Client,
    tokens: TokenProvider,
    bucket: String,
    api_base_url: String,
    public_base_url: String,
}

impl GcsObjectStore {
    /// Create a store for `bucket` authenticated by the key at `credential_path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the key file is unusable or the operator cannot
    /// be built.
    pub fn new(
        bucket: &str,
        credential_path: &Path,
        api_base_url: &str,
        public_base_url: &str,
    ) -> Result<Self, StorageError> {
        let tokens = TokenProvider::from_file(credential_path)?;

        let path = credential_path
            .to_str()
            .ok_or_else(|| StorageError::configuration("invalid credential path"))?;
        let builder = services::Gcs::default()
            .bucket(bucket)
            .credential_path(path);
        let operator = Operator::new(builder)
            .map_err(|e| StorageError::configuration(e.to_string()))?
            .finish();

        tracing::debug!(
            bucket,
            client_email = tokens.client_email(),
            "GCS object store initialized"
        );

        Ok(Self {
            operator,
            http: reqwest::Client::new(),
            tokens,
            bucket: bucket.to_string(),
            api_base_url: api_base_url.to_string(),
            public_base_url: public_base_url.to_string(),
        })
    }

    /// JSON API endpoint for the ACL of `name`.
    fn acl_url(&self, name: &str) -> Result<Url, StorageError> {
        acl_url(&self.api_base_url, &self.bucket, name)
    }
}

/// `{api_base}/storage/v1/b/{bucket}/o/{name}/acl`, with `name` percent-encoded
/// as a single path segment.
fn acl_url(api_base: &str, bucket: &str, name: &str) -> Result<Url, StorageError> {
    let mut url = Url::parse(api_base)
        .map_err(|e| StorageError::configuration(format!("invalid API base URL: {e}")))?;
    url.path_segments_mut()
        .map_err(|()| StorageError::configuration("API base URL cannot carry a path"))?
        .pop_if_empty()
        .extend(["storage", "v1", "b", bucket, "o", name, "acl"]);
    Ok(url)
}

/// Gzip `content` at the default compression level.
fn gzip(content: &[u8]) -> Result<Vec<u8>, StorageError> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(content.len() / 2), Compression::default());
    encoder
        .write_all(content)
        .map_err(|e| StorageError::operation(format!("compression failed: {e}")))?;
    encoder
        .finish()
        .map_err(|e| StorageError::operation(format!("compression failed: {e}")))
}

#[async_trait]
impl ObjectStore for GcsObjectStore {
    async fn write(
        &self,
        name: &str,
        content: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let compressed = tokio::task::spawn_blocking(move || gzip(&content))
            .await
            .map_err(|e| StorageError::operation(e.to_string()))??;

        self.operator
            .write_with(name, compressed)
            .content_type(content_type)
            .content_encoding(CONTENT_ENCODING)
            .await?;
        Ok(())
    }

    async fn make_public(&self, name: &str) -> Result<(), StorageError> {
        let token = self.tokens.access_token(&self.http).await?;
        let response = self
            .http
            .post(self.acl_url(name)?)
            .bearer_auth(token)
            .json(&json!({ "entity": "allUsers", "role": "READER" }))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(StorageError::rejected(status.as_u16(), body))
        }
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn public_url(&self, name: &str) -> String {
        public_object_url(&self.public_base_url, &self.bucket, name)
    }
}
