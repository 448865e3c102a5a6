//! Storage configuration types.

use std::path::PathBuf;

/// Storage provider configuration.
#[derive(Debug, Clone)]
pub enum StorageProvider {
    /// Google Cloud Storage.
    Gcs {
        /// Bucket name.
        bucket: String,
        /// Cloud project identifier (informational).
        project_id: Option<String>,
        /// Path to the service account key file.
        credential_path: PathBuf,
        /// Host of the storage JSON API.
        api_base_url: String,
    },
    /// In-process memory store (development only)
    Memory {
        /// Bucket name used when building public URLs.
        bucket: String,
    },
}

impl StorageProvider {
    /// Default JSON API host for Google Cloud Storage.
    pub const GCS_API_BASE_URL: &'static str = "https://storage.googleapis.com";

    /// Create a Google Cloud Storage provider.
    #[must_use]
    pub fn gcs(bucket: impl Into<String>, credential_path: impl Into<PathBuf>) -> Self {
        Self::Gcs {
            bucket: bucket.into(),
            project_id: None,
            credential_path: credential_path.into(),
            api_base_url: Self::GCS_API_BASE_URL.to_string(),
        }
    }

    /// Create an in-process memory provider (development only).
    #[must_use]
    pub fn memory(bucket: impl Into<String>) -> Self {
        Self::Memory {
            bucket: bucket.into(),
        }
    }

    /// Set the project identifier. No effect on the memory provider.
    #[must_use]
    pub fn with_project_id(mut self, id: Option<String>) -> Self {
        if let Self::Gcs { project_id, .. } = &mut self {
            *project_id = id;
        }
        self
    }

    /// Set the JSON API host. No effect on the memory provider.
    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        if let Self::Gcs { api_base_url, .. } = &mut self {
            *api_base_url = url.into();
        }
        self
    }

    /// Get the provider name for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Gcs { .. } => "gcs",
            Self::Memory { .. } => "memory",
        }
    }

    /// Get the bucket name.
    #[must_use]
    pub fn bucket(&self) -> &str {
        match self {
            Self::Gcs { bucket, .. } | Self::Memory { bucket } => bucket,
        }
    }

    /// Get the cloud project identifier, if one was configured.
    #[must_use]
    pub fn project_id(&self) -> Option<&str> {
        match self {
            Self::Gcs { project_id, .. } => project_id.as_deref(),
            Self::Memory { .. } => None,
        }
    }
}

/// Storage service configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Storage provider configuration.
    pub provider: StorageProvider,
    /// Host prefix of public object URLs.
    pub public_base_url: String,
}

impl StorageConfig {
    /// Default host of public object URLs.
    pub const DEFAULT_PUBLIC_BASE_URL: &'static str = "https://storage.googleapis.com";

    /// Create a new storage config with default settings.
    #[must_use]
    pub fn new(provider: StorageProvider) -> Self {
        Self {
            provider,
            public_base_url: Self::DEFAULT_PUBLIC_BASE_URL.to_string(),
        }
    }

    /// Set the public URL host.
    #[must_use]
    pub fn with_public_base_url(mut self, url: impl Into<String>) -> Self {
        self.public_base_url = url.into();
        self
    }
}
