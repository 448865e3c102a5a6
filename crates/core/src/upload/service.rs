//! Upload service implementation.

use std::sync::Arc;

use tracing::{error, info};

use super::error::UploadError;
use super::policy::UploadPolicy;
use super::types::{UploadRequest, UploadResult};
use crate::naming;
use crate::storage::ObjectStore;

/// Runs one upload through validate, name, write, publish.
///
/// Holds no per-request state; one instance serves all requests.
pub struct UploadService {
    store: Arc<dyn ObjectStore>,
    policy: UploadPolicy,
}

impl UploadService {
    /// Create a new upload service.
    #[must_use]
    pub fn new(store: Arc<dyn ObjectStore>, policy: UploadPolicy) -> Self {
        Self { store, policy }
    }

    /// The policy files are checked against.
    #[must_use]
    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    /// Store the file in `request` and make it publicly readable.
    ///
    /// Publishing starts only after the write has completed. A failed write
    /// ends the upload without publishing; a failed publish leaves the
    /// written object in place. Nothing is retried.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The request has no file
    /// - The file is too large or of a refused type
    /// - The storage write fails
    /// - The object cannot be made public
    pub async fn upload(&self, request: UploadRequest) -> Result<UploadResult, UploadError> {
        let description = request.description_or_default();
        let file = request.file.ok_or(UploadError::NoFile)?;

        self.policy
            .check_size(u64::try_from(file.content.len()).unwrap_or(u64::MAX))?;
        self.policy
            .check_file_type(&file.content_type, &file.filename)?;

        let name = naming::object_name(&file.filename);
        let size = file.content.len();

        self.store
            .write(&name, file.content, &file.content_type)
            .await
            .map_err(|e| {
                error!(object = %name, error = %e, "Failed to write object");
                UploadError::storage(&name, e)
            })?;

        self.store.make_public(&name).await.map_err(|e| {
            error!(
                object = %name,
                error = %e,
                "Failed to make object public; object remains stored"
            );
            UploadError::publish(&name, e)
        })?;

        let url = self.store.public_url(&name);
        info!(
            object = %name,
            original = %file.filename,
            content_type = %file.content_type,
            size,
            url = %url,
            "File uploaded"
        );

        Ok(UploadResult {
            object_name: name,
            url,
            description,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryObjectStore, MockObjectStore, StorageError};
    use crate::upload::{DEFAULT_DESCRIPTION, UploadedFile, ValidationError};
    use bytes::Bytes;
    use mockall::Sequence;

    fn png(size: usize) -> UploadedFile {
        UploadedFile {
            filename: "avatar.png".to_string(),
            content_type: "image/png".to_string(),
            content: Bytes::from(vec![0u8; size]),
        }
    }

    fn request(file: UploadedFile, description: Option<&str>) -> UploadRequest {
        UploadRequest {
            file: Some(file),
            description: description.map(String::from),
        }
    }

    fn service(store: MockObjectStore) -> UploadService {
        UploadService::new(Arc::new(store), UploadPolicy::new())
    }

    #[tokio::test]
    async fn test_no_file_touches_no_storage() {
        // A mock without expectations panics on any call.
        let service = service(MockObjectStore::new());
        let result = service.upload(UploadRequest::default()).await;
        assert!(matches!(result, Err(UploadError::NoFile)));
    }

    #[tokio::test]
    async fn test_rejected_type_touches_no_storage() {
        let service = service(MockObjectStore::new());
        let file = UploadedFile {
            filename: "data.json".to_string(),
            content_type: "application/json".to_string(),
            content: Bytes::from_static(b"{}"),
        };

        let result = service.upload(request(file, None)).await;
        assert!(matches!(
            result,
            Err(UploadError::Validation(
                ValidationError::UnsupportedFileType { .. }
            ))
        ));
    }

    #[tokio::test]
    async fn test_oversized_file_touches_no_storage() {
        let service = UploadService::new(
            Arc::new(MockObjectStore::new()),
            UploadPolicy::new().with_max_file_size(512),
        );

        let result = service.upload(request(png(513), None)).await;
        assert!(matches!(
            result,
            Err(UploadError::Validation(ValidationError::FileTooLarge {
                size: 513,
                max: 512
            }))
        ));
    }

    #[tokio::test]
    async fn test_write_then_publish_in_order() {
        let mut store = MockObjectStore::new();
        let mut seq = Sequence::new();
        store
            .expect_write()
            .withf(|name, content, content_type| {
                name.len() == 12
                    && name.ends_with(".png")
                    && content.len() == 1024
                    && content_type.eq_ignore_ascii_case("image/png")
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(()));
        store
            .expect_make_public()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        store
            .expect_public_url()
            .times(1)
            .returning(|name| format!("https://storage.googleapis.com/uploads/{name}"));

        let result = service(store)
            .upload(request(png(1024), Some("profile pic")))
            .await
            .expect("upload should succeed");

        assert!(result.url.starts_with("https://storage.googleapis.com/uploads/"));
        assert!(result.url.ends_with(&result.object_name));
        assert!(result.object_name.ends_with(".png"));
        assert_eq!(result.description, "profile pic");
    }

    #[tokio::test]
    async fn test_write_failure_skips_publish() {
        let mut store = MockObjectStore::new();
        store
            .expect_write()
            .times(1)
            .returning(|_, _, _| Err(StorageError::operation("connection reset")));
        store.expect_make_public().never();
        store.expect_public_url().never();

        let err = service(store)
            .upload(request(png(16), None))
            .await
            .unwrap_err();
        match err {
            UploadError::Storage { name, source } => {
                assert!(name.ends_with(".png"));
                assert!(matches!(source, StorageError::Operation(_)));
            }
            other => panic!("expected storage error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_publish_failure_reports_publish_error() {
        let mut store = MockObjectStore::new();
        store.expect_write().times(1).returning(|_, _, _| Ok(()));
        store
            .expect_make_public()
            .times(1)
            .returning(|_| Err(StorageError::rejected(403, "forbidden")));
        store.expect_public_url().never();

        let err = service(store)
            .upload(request(png(16), None))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            UploadError::Publish {
                source: StorageError::Rejected { status: 403, .. },
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_publish_failure_leaves_object_stored() {
        struct PublishFails(MemoryObjectStore);

        #[async_trait::async_trait]
        impl ObjectStore for PublishFails {
            async fn write(
                &self,
                name: &str,
                content: Bytes,
                content_type: &str,
            ) -> Result<(), StorageError> {
                self.0.write(name, content, content_type).await
            }

            fn bucket(&self) -> &str {
                self.0.bucket()
            }

            async fn make_public(&self, _name: &str) -> Result<(), StorageError> {
                Err(StorageError::rejected(403, "forbidden"))
            }

            fn public_url(&self, name: &str) -> String {
                self.0.public_url(name)
            }
        }

        let store = Arc::new(PublishFails(
            MemoryObjectStore::new("uploads", "https://storage.googleapis.com")
                .expect("memory store should build"),
        ));
        let service = UploadService::new(store.clone(), UploadPolicy::new());

        let err = service
            .upload(request(png(16), None))
            .await
            .unwrap_err();
        let UploadError::Publish { name, .. } = err else {
            panic!("expected publish error");
        };
        assert!(store.0.exists(&name).await);
        assert!(!store.0.is_public(&name));
    }

    #[tokio::test]
    async fn test_identical_uploads_get_distinct_names() {
        let store = Arc::new(
            MemoryObjectStore::new("uploads", "https://storage.googleapis.com")
                .expect("memory store should build"),
        );
        let service = UploadService::new(store.clone(), UploadPolicy::new());

        let first = service
            .upload(request(png(64), None))
            .await
            .expect("first upload");
        let second = service
            .upload(request(png(64), None))
            .await
            .expect("second upload");

        assert_ne!(first.object_name, second.object_name);
        assert!(store.is_public(&first.object_name));
        assert!(store.is_public(&second.object_name));
        assert_eq!(first.description, DEFAULT_DESCRIPTION);
    }
}
