//! Router configuration for the API.

use std::path::PathBuf;
use std::time::Duration;

use axum::{
    Router,
    handler::HandlerWithoutStateExt,
    http::StatusCode,
    middleware,
    routing::{MethodRouter, get_service},
};
use tower_http::{services::ServeDir, timeout::TimeoutLayer};

use crate::api::handlers;
use crate::api::middleware::{
    logging_middleware, not_found_handler, recovery_middleware, request_id_middleware,
};
use crate::state::AppState;

/// Creates the main application router with all routes and middleware.
///
/// # Routes
/// - `POST /api/v1/notify` - Moodle webhook
/// - `GET /health` - Liveness probe
/// - `GET /static/*` - Files from `assets_dir`, when it exists
/// - anything else, including a known path with another method - 404
///
/// # Middleware Order
/// Last added runs first, so a request passes through:
/// request id → logging → recovery → timeout → handler
pub fn create_router(
    state: AppState,
    assets_dir: Option<PathBuf>,
    request_timeout: Duration,
) -> Router {
    let api_routes = Router::new()
        .merge(handlers::notify::notify_routes())
        .method_not_allowed_fallback(not_found_handler);

    let mut router = Router::new()
        .nest("/api/v1", api_routes)
        .merge(handlers::health::health_routes());

    match assets_dir {
        Some(dir) if dir.is_dir() => {
            tracing::info!(path = %dir.display(), "Serving static assets under /static");
            // GET/HEAD only; other methods and missing files get the plain 404
            let files = ServeDir::new(dir).not_found_service(not_found_handler.into_service());
            let static_files: MethodRouter = get_service(files).fallback(not_found_handler);
            router = router.nest_service("/static", static_files);
        }
        Some(dir) => {
            tracing::warn!(path = %dir.display(), "Assets directory not found, /static is disabled");
        }
        None => {
            tracing::warn!("No bundle path configured, /static is disabled");
        }
    }

    router
        .method_not_allowed_fallback(not_found_handler)
        .fallback(not_found_handler)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(middleware::from_fn(recovery_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
