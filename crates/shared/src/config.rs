//! Application configuration management.

use std::path::PathBuf;

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Object storage configuration.
    pub storage: StorageSettings,
    /// Upload limits.
    #[serde(default)]
    pub upload: UploadSettings,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Which object storage backend to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Google Cloud Storage.
    #[default]
    Gcs,
    /// In-process store, for local development only.
    Memory,
}

/// Object storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// Backend selection.
    #[serde(default)]
    pub provider: StorageBackend,
    /// Bucket that receives uploads.
    pub bucket: String,
    /// Cloud project identifier.
    #[serde(default)]
    pub project_id: Option<String>,
    /// Path to the service account key file.
    #[serde(default)]
    pub credential_path: Option<PathBuf>,
    /// Host prefix of public object URLs.
    #[serde(default = "default_storage_host")]
    pub public_base_url: String,
    /// Host of the storage JSON API (ACL changes).
    #[serde(default = "default_storage_host")]
    pub api_base_url: String,
}

fn default_storage_host() -> String {
    "https://storage.googleapis.com".to_string()
}

/// Upload limits.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadSettings {
    /// Maximum accepted file size in bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            max_file_size: default_max_file_size(),
        }
    }
}

fn default_max_file_size() -> u64 {
    10 * 1024 * 1024 // 10 MiB
}

impl AppConfig {
    /// Loads configuration from config files and the environment.
    ///
    /// Precedence, lowest first: `config/default`, `config/{RUN_MODE}`,
    /// `BUCKETDROP__*` variables, then the flat `PORT`, `KEY_PATH`,
    /// `GCLOUD_PROJECT_ID` and `GCLOUD_BUCKET` variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or a required
    /// value (the bucket name) is missing.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("BUCKETDROP").separator("__"))
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .set_override_option("storage.credential_path", std::env::var("KEY_PATH").ok())?
            .set_override_option("storage.project_id", std::env::var("GCLOUD_PROJECT_ID").ok())?
            .set_override_option("storage.bucket", std::env::var("GCLOUD_BUCKET").ok())?
            .build()?;

        config.try_deserialize()
    }
}
