// API routes for the form-generation service.
pub mod forms;

use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

pub fn build_router(state: Arc<AppState>) -> Router {
    let max_upload = state.config.server.max_upload_bytes;
    Router::new()
        .route("/", get(forms::index))
        .route("/healthz", get(forms::healthz))
        .route("/upload", post(forms::upload))
        .layer(DefaultBodyLimit::max(max_upload))
        .with_state(state)
}
