//! Upload types and data structures.

use bytes::Bytes;

/// Description echoed back when the client sent none.
pub const DEFAULT_DESCRIPTION: &str = "No description provided.";

/// A fully buffered file part.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Original filename as sent by the client.
    pub filename: String,
    /// Declared media type.
    pub content_type: String,
    /// File bytes.
    pub content: Bytes,
}

/// One upload as received from the client.
#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    /// The file part, if any.
    pub file: Option<UploadedFile>,
    /// Free-text description field.
    pub description: Option<String>,
}

impl UploadRequest {
    /// The description to echo, with empty or missing values defaulted.
    #[must_use]
    pub fn description_or_default(&self) -> String {
        self.description
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or(DEFAULT_DESCRIPTION)
            .to_string()
    }
}

/// Outcome of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    /// Generated object name.
    pub object_name: String,
    /// Public URL of the object.
    pub url: String,
    /// Echoed description.
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_defaults() {
        let mut request = UploadRequest::default();
        assert_eq!(request.description_or_default(), DEFAULT_DESCRIPTION);

        request.description = Some(String::new());
        assert_eq!(request.description_or_default(), DEFAULT_DESCRIPTION);

        request.description = Some("profile pic".to_string());
        assert_eq!(request.description_or_default(), "profile pic");
    }
}
