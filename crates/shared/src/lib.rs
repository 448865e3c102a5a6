//! Shared configuration for Bucketdrop.
//!
//! Every other crate reads its settings through [`AppConfig`], which merges
//! config files, `BUCKETDROP__*` variables and the flat variables used by
//! older deployments (`PORT`, `KEY_PATH`, `GCLOUD_PROJECT_ID`, `GCLOUD_BUCKET`).

pub mod config;

pub use config::{AppConfig, ServerConfig, StorageBackend, StorageSettings, UploadSettings};
