//! Object storage adapters for uploaded files.
//!
//! The upload pipeline only sees the [`ObjectStore`] trait. Two backends
//! implement it:
//! - Google Cloud Storage (`opendal` for writes, the JSON API for ACLs)
//! - An in-process memory store (development and tests)
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        ObjectStore                            │
//! ├──────────────────────────────┬───────────────────────────────┤
//! │ write(name, bytes, type)     │ make_public(name)             │
//! │   gzip + opendal GCS write   │   POST .../o/{name}/acl       │
//! │                              │   (allUsers: READER)          │
//! ├──────────────────────────────┴───────────────────────────────┤
//! │ public_url(name) = {public_base_url}/{bucket}/{name}          │
//! └──────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod gcs;
mod memory;
mod store;
mod token;

pub use config::{StorageConfig, StorageProvider};
pub use error::StorageError;
pub use gcs::GcsObjectStore;
pub use memory::MemoryObjectStore;
#[cfg(test)]
pub use store::MockObjectStore;
pub use store::{ObjectStore, connect, public_object_url};
pub use token::TokenProvider;
