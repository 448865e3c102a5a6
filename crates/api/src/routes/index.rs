//! Landing page.

use axum::{Router, response::Html, routing::get};

use crate::AppState;

/// Greeting served at `/`.
pub const GREETING: &str = "<h1>File Upload API</h1>";

async fn index() -> Html<&'static str> {
    Html(GREETING)
}

/// Creates the landing page route.
pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(index))
}
