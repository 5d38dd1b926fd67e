// src/server/routes.rs
// =============================================================================
// Route table of the HTTP API.
//
// - POST /analyze: analyze one page (anything but POST gets a JSON 405)
// - GET /health: liveness check
// - anything else: files from the static directory when one is configured,
//   axum's plain 404 otherwise
// =============================================================================

use std::path::PathBuf;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use super::handlers::{self, AppState};

/// Create the router with all routes
pub fn create_router(app_state: AppState, static_dir: Option<PathBuf>) -> Router {
    let router = Router::new()
        .route(
            "/analyze",
            post(handlers::analyze).fallback(handlers::method_not_allowed),
        )
        .route("/health", get(handlers::health));

    let router = match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router.with_state(app_state)
}
