pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        // Resume upload
        .route("/api/v1/resumes/extract", post(handlers::handle_extract))
        .route("/api/v1/resumes/analyze", post(handlers::handle_analyze))
        // Pre-extracted text
        .route("/api/v1/analysis/text", post(handlers::handle_analyze_text))
        .layer(body_limit)
        .with_state(state)
}
