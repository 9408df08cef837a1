//! Router assembly: HTTP endpoints, static files, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;

/// Build the application router with:
/// - Generation/packaging API under `/api/...`
/// - SCORM Cloud hosting API under `/api/courses/...` (503 when unconfigured)
/// - Static authoring page from `./static` with index fallback
/// - CORS (allow any origin/method/headers) – adjust for production if needed
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    // Static files with index fallback
    let static_service = ServeDir::new("./static")
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new("./static/index.html"));

    Router::new()
        // Generation + packaging
        .route("/api/health", get(http::http_health))
        .route("/api/generate", post(http::http_post_generate))
        .route("/api/preview", post(http::http_post_preview))
        .route("/api/package", post(http::http_post_package))
        // SCORM Cloud hosting
        .route("/api/courses", get(http::http_list_courses).post(http::http_upload_course))
        .route("/api/courses/:course_id", delete(http::http_delete_course))
        .route("/api/courses/:course_id/launch", get(http::http_launch_course))
        .route("/api/courses/:course_id/progress", get(http::http_course_progress))
        // State + CORS + HTTP tracing
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Authoring page fallback
        .fallback_service(static_service)
}
