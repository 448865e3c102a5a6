//! Single-file upload pipeline.
//!
//! This module provides:
//! - The file type and size policy applied before a file is accepted
//! - The validate, name, write, publish sequence for one upload
//! - Request and result types shared with the HTTP layer

mod error;
mod policy;
mod service;
mod types;

pub use error::{UploadError, ValidationError};
pub use policy::{ALLOWED_FILE_TYPES, UploadPolicy, is_allowed_extension, is_allowed_media_type};
pub use service::UploadService;
pub use types::{DEFAULT_DESCRIPTION, UploadRequest, UploadResult, UploadedFile};
