//! Single-page web front end: one shared session behind a JSON API.

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

pub mod error;
pub mod handlers;
pub mod models;
pub mod state;
pub mod template;
pub mod upload;

pub use state::AppState;

/// Build the application router.
pub fn router(state: Arc<AppState>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(handlers::index::index))
        .route("/api/state", get(handlers::session::state))
        .route("/api/models", get(handlers::session::models))
        .route("/api/settings", post(handlers::session::settings))
        .route("/api/upload", post(handlers::upload::upload))
        .route("/api/ask", post(handlers::ask::ask))
        .route("/api/clear", post(handlers::session::clear))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
