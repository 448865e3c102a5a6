//! File acceptance policy.
//!
//! Decisions rest only on client-declared metadata: the media type and the
//! filename. File content is never inspected, so a renamed executable with
//! an `image/png` label passes.

use super::error::ValidationError;
use crate::naming::file_extension;

/// Tokens that must appear in both the media type and the extension.
pub const ALLOWED_FILE_TYPES: &[&str] = &["jpeg", "jpg", "png", "gif", "pdf", "doc", "docx"];

/// Whether the declared media type mentions an allowed token.
///
/// Matching is by case-sensitive substring anywhere in the string, so
/// `application/msword` is refused while the `.docx` media type passes.
#[must_use]
pub fn is_allowed_media_type(media_type: &str) -> bool {
    ALLOWED_FILE_TYPES.iter().any(|t| media_type.contains(t))
}

/// Whether the filename's extension, lowercased, mentions an allowed token.
#[must_use]
pub fn is_allowed_extension(filename: &str) -> bool {
    let ext = file_extension(filename).to_ascii_lowercase();
    ALLOWED_FILE_TYPES.iter().any(|t| ext.contains(t))
}

/// Limits applied to an incoming file.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    max_file_size: u64,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadPolicy {
    /// Default max file size: 10 MiB.
    pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

    /// Create a policy with default limits.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_file_size: Self::DEFAULT_MAX_FILE_SIZE,
        }
    }

    /// Set maximum file size.
    #[must_use]
    pub const fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    /// Maximum file size in bytes.
    #[must_use]
    pub const fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Accept or reject a file by its declared media type and filename.
    ///
    /// Both checks must pass.
    pub fn check_file_type(&self, media_type: &str, filename: &str) -> Result<(), ValidationError> {
        if is_allowed_media_type(media_type) && is_allowed_extension(filename) {
            Ok(())
        } else {
            Err(ValidationError::unsupported(media_type, filename))
        }
    }

    /// Reject files larger than the configured maximum.
    pub fn check_size(&self, size: u64) -> Result<(), ValidationError> {
        if size > self.max_file_size {
            return Err(ValidationError::file_too_large(size, self.max_file_size));
        }
        Ok(())
    }
}
