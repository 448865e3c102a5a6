//! Bucketdrop API Server
//!
//! Accepts multipart uploads and publishes them to a storage bucket.

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bucketdrop_api::{AppState, create_router};
use bucketdrop_core::storage::{self, StorageConfig, StorageError, StorageProvider};
use bucketdrop_core::upload::{UploadPolicy, UploadService};
use bucketdrop_shared::{AppConfig, StorageBackend, StorageSettings};

/// Build the storage configuration from loaded settings.
fn storage_config(settings: &StorageSettings) -> Result<StorageConfig, StorageError> {
    let provider = match settings.provider {
        StorageBackend::Gcs => {
            let credential_path = settings.credential_path.clone().ok_or_else(|| {
                StorageError::configuration("KEY_PATH must be set for the gcs provider")
            })?;
            StorageProvider::gcs(&settings.bucket, credential_path)
                .with_project_id(settings.project_id.clone())
                .with_api_base_url(&settings.api_base_url)
        }
        StorageBackend::Memory => StorageProvider::memory(&settings.bucket),
    };

    Ok(StorageConfig::new(provider).with_public_base_url(&settings.public_base_url))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bucketdrop=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let storage_config = storage_config(&config.storage)?;
    let store = storage::connect(&storage_config)?;
    info!(
        provider = storage_config.provider.name(),
        bucket = store.bucket(),
        project_id = storage_config.provider.project_id().unwrap_or("-"),
        "Storage connected"
    );

    let policy = UploadPolicy::new().with_max_file_size(config.upload.max_file_size);
    let state = AppState::new(UploadService::new(store, policy));
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn settings(provider: StorageBackend, credential_path: Option<&str>) -> StorageSettings {
        StorageSettings {
            provider,
            bucket: "uploads".to_string(),
            project_id: Some("demo-project".to_string()),
            credential_path: credential_path.map(PathBuf::from),
            public_base_url: "https://cdn.example.com".to_string(),
            api_base_url: "https://storage.googleapis.com".to_string(),
        }
    }

    #[test]
    fn test_gcs_requires_credentials() {
        let err = storage_config(&settings(StorageBackend::Gcs, None)).unwrap_err();
        assert!(matches!(err, StorageError::Configuration(_)));
    }

    #[test]
    fn test_gcs_settings_carry_over() {
        let config =
            storage_config(&settings(StorageBackend::Gcs, Some("/secrets/key.json"))).unwrap();
        assert_eq!(config.provider.name(), "gcs");
        assert_eq!(config.provider.bucket(), "uploads");
        assert_eq!(config.provider.project_id(), Some("demo-project"));
        assert_eq!(config.public_base_url, "https://cdn.example.com");
    }

    #[test]
    fn test_memory_ignores_credentials() {
        let config = storage_config(&settings(StorageBackend::Memory, None)).unwrap();
        assert_eq!(config.provider.name(), "memory");
    }
}
