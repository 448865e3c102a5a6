//! Upload error types.

use thiserror::Error;

use crate::storage::StorageError;

/// Reasons a file is refused before any storage interaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Declared media type or filename extension is not on the allow-list.
    #[error("Only images, pdf, and documents are allowed!")]
    UnsupportedFileType {
        /// Declared media type.
        media_type: String,
        /// Original filename.
        filename: String,
    },

    /// File is larger than the configured ceiling.
    #[error("File too large")]
    FileTooLarge {
        /// Actual file size.
        size: u64,
        /// Maximum allowed size.
        max: u64,
    },
}

impl ValidationError {
    /// Create an unsupported file type error.
    #[must_use]
    pub fn unsupported(media_type: impl Into<String>, filename: impl Into<String>) -> Self {
        Self::UnsupportedFileType {
            media_type: media_type.into(),
            filename: filename.into(),
        }
    }

    /// Create a file too large error.
    #[must_use]
    pub fn file_too_large(size: u64, max: u64) -> Self {
        Self::FileTooLarge { size, max }
    }
}

/// Upload pipeline errors, one per terminal failure state.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The request carried no file part.
    #[error("no file uploaded")]
    NoFile,

    /// The file was refused by the upload policy.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Writing the object failed; nothing was published.
    #[error("upload of {name} failed: {source}")]
    Storage {
        /// Generated object name.
        name: String,
        /// Underlying storage failure.
        source: StorageError,
    },

    /// The object was written but could not be made public.
    ///
    /// The bytes remain in the bucket.
    #[error("publishing {name} failed: {source}")]
    Publish {
        /// Generated object name.
        name: String,
        /// Underlying storage failure.
        source: StorageError,
    },
}

impl UploadError {
    /// Create a storage (write stage) error.
    #[must_use]
    pub fn storage(name: impl Into<String>, source: StorageError) -> Self {
        Self::Storage {
            name: name.into(),
            source,
        }
    }

    /// Create a publish stage error.
    #[must_use]
    pub fn publish(name: impl Into<String>, source: StorageError) -> Self {
        Self::Publish {
            name: name.into(),
            source,
        }
    }
}
