//! File upload route.
//!
//! `POST /upload` takes a multipart form with one file part named `file`
//! and an optional `description` text field.

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State, multipart::MultipartRejection},
    routing::post,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::debug;

use crate::{AppState, error::ApiError};
use bucketdrop_core::upload::{UploadPolicy, UploadRequest, UploadedFile};

/// Form field carrying the file.
pub const FILE_FIELD: &str = "file";

/// Form field carrying the description.
pub const DESCRIPTION_FIELD: &str = "description";

/// Media type assumed for file parts that declare none.
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Creates the upload route with its body size ceiling.
pub fn routes(body_limit: usize) -> Router<AppState> {
    Router::new().route(
        "/upload",
        post(upload).layer(DefaultBodyLimit::max(body_limit)),
    )
}

/// Response for a successful upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Fixed success message.
    pub message: &'static str,
    /// Public URL of the stored object.
    pub url: String,
    /// Echoed description.
    pub description: String,
}

/// POST `/upload`
async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let request = match multipart {
        Ok(multipart) => read_form(multipart, state.uploads.policy()).await?,
        Err(rejection) => {
            debug!(%rejection, "Upload request is not multipart");
            UploadRequest::default()
        }
    };

    let result = state.uploads.upload(request).await?;

    Ok(Json(UploadResponse {
        message: "File uploaded successfully.",
        url: result.url,
        description: result.description,
    }))
}

/// Collect the file and description parts of the form.
///
/// The file type is checked from the part headers before its bytes are
/// buffered. Unknown text fields are ignored; a file part under any name
/// other than `file`, or a second file, is refused.
async fn read_form(
    mut multipart: Multipart,
    policy: &UploadPolicy,
) -> Result<UploadRequest, ApiError> {
    let mut request = UploadRequest::default();

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);

        match (field_name.as_str(), file_name) {
            (FILE_FIELD, Some(filename)) => {
                if request.file.is_some() {
                    return Err(ApiError::unexpected_field());
                }
                let content_type = field
                    .content_type()
                    .unwrap_or(DEFAULT_CONTENT_TYPE)
                    .to_string();
                policy.check_file_type(&content_type, &filename)?;

                let content: Bytes = field.bytes().await?;
                debug!(%filename, %content_type, size = content.len(), "File part received");
                request.file = Some(UploadedFile {
                    filename,
                    content_type,
                    content,
                });
            }
            (_, Some(_)) => return Err(ApiError::unexpected_field()),
            (DESCRIPTION_FIELD, None) => request.description = Some(field.text().await?),
            _ => {}
        }
    }

    Ok(request)
}
