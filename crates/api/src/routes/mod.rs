//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod health;
pub mod index;
pub mod upload;

/// Creates the router with all routes.
///
/// `body_limit` caps the request body of `/upload`, in bytes.
pub fn api_routes(body_limit: usize) -> Router<AppState> {
    Router::new()
        .merge(index::routes())
        .merge(health::routes())
        .merge(upload::routes(body_limit))
}
