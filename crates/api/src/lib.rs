//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes (`/`, `/health`, `/upload`)
//! - The API error type and its status/JSON mapping
//! - Router assembly with tracing, CORS and panic recovery

pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use bucketdrop_core::upload::UploadService;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Upload pipeline, bound to the configured bucket.
    pub uploads: Arc<UploadService>,
}

impl AppState {
    /// Wrap an upload service for sharing across handlers.
    #[must_use]
    pub fn new(uploads: UploadService) -> Self {
        Self {
            uploads: Arc::new(uploads),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    let body_limit =
        usize::try_from(state.uploads.policy().max_file_size()).unwrap_or(usize::MAX);

    Router::new()
        .merge(routes::api_routes(body_limit))
        .layer(CatchPanicLayer::custom(error::handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
