//! API error type and its HTTP mapping.
//!
//! Every failure of a request ends in exactly one of these variants, each
//! with a fixed status code and JSON shape.

use std::any::Any;

use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use bucketdrop_core::upload::{UploadError, ValidationError};

/// Message for a file part under the wrong field name, or a second file.
pub const UNEXPECTED_FIELD: &str = "Unexpected field";

/// Message for bodies over the size ceiling.
pub const FILE_TOO_LARGE: &str = "File too large";

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Refused type, oversized or malformed multipart body.
    #[error("{0}")]
    Validation(String),

    /// No file part in the request.
    #[error("No file uploaded.")]
    NoFile,

    /// Writing the object failed.
    #[error("Error uploading file.")]
    Storage(String),

    /// The object was written but not made public.
    #[error("Error making file public.")]
    Publish(String),

    /// Anything not anticipated above. The raw message reaches the client.
    #[error("{0}")]
    Unknown(String),
}

impl ApiError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::NoFile => StatusCode::BAD_REQUEST,
            Self::Storage(_) | Self::Publish(_) | Self::Unknown(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Create an unexpected field error.
    #[must_use]
    pub fn unexpected_field() -> Self {
        Self::Validation(UNEXPECTED_FIELD.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();
        let body = match self {
            Self::Storage(detail) | Self::Publish(detail) => {
                json!({ "message": message, "error": detail })
            }
            Self::Validation(_) | Self::NoFile | Self::Unknown(_) => json!({ "message": message }),
        };
        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::NoFile => Self::NoFile,
            UploadError::Validation(e) => e.into(),
            UploadError::Storage { source, .. } => Self::Storage(source.to_string()),
            UploadError::Publish { source, .. } => Self::Publish(source.to_string()),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::Validation(FILE_TOO_LARGE.to_string())
        } else {
            Self::Validation(err.body_text())
        }
    }
}

/// Turn a handler panic into a 500 carrying the panic message.
#[allow(clippy::needless_pass_by_value)]
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "Unknown panic message".to_string()
    };
    tracing::error!(%message, "Handler panicked");
    ApiError::Unknown(message).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bucketdrop_core::storage::StorageError;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::Validation(String::new()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::NoFile.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Storage(String::new()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Publish(String::new()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Unknown(String::new()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_from_upload_error() {
        assert!(matches!(ApiError::from(UploadError::NoFile), ApiError::NoFile));

        let err = ApiError::from(UploadError::from(ValidationError::unsupported(
            "application/json",
            "a.json",
        )));
        assert_eq!(err.to_string(), "Only images, pdf, and documents are allowed!");

        let err = ApiError::from(UploadError::storage(
            "a.png",
            StorageError::operation("connection reset"),
        ));
        assert!(
            matches!(err, ApiError::Storage(ref detail) if detail == "storage operation failed: connection reset")
        );

        let err = ApiError::from(UploadError::publish(
            "a.png",
            StorageError::rejected(403, "forbidden"),
        ));
        assert!(matches!(err, ApiError::Publish(_)));
    }

    #[tokio::test]
    async fn test_storage_error_body() {
        let response = ApiError::Storage("disk on fire".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({ "message": "Error uploading file.", "error": "disk on fire" })
        );
    }

    #[tokio::test]
    async fn test_no_file_body() {
        let response = ApiError::NoFile.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({ "message": "No file uploaded." })
        );
    }

    #[tokio::test]
    async fn test_panic_maps_to_unknown() {
        let response = handle_panic(Box::new("index out of bounds"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({ "message": "index out of bounds" })
        );

        let response = handle_panic(Box::new(String::from("owned message")));
        assert_eq!(
            body_json(response).await,
            json!({ "message": "owned message" })
        );
    }
}
