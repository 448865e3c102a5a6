//! Upload pipeline for Bucketdrop.
//!
//! This crate holds everything between "a file arrived" and "here is its
//! public URL", with no web framework dependencies.
//!
//! # Modules
//!
//! - `naming` - Random object name generation
//! - `storage` - Object storage adapters (Google Cloud Storage, in-memory)
//! - `upload` - File type policy and the validate/write/publish pipeline

pub mod naming;
pub mod storage;
pub mod upload;
