use crate::handlers::{self, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Request body cap for the API routes.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Dashboard API routes under `/api/v1`.
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/v1/contacts",
            get(handlers::list_contacts).post(handlers::create_contact),
        )
        .route("/api/v1/contacts/sync", post(handlers::sync_contacts))
        .route("/api/v1/analytics", get(handlers::analytics))
        .route("/api/v1/campaigns", get(handlers::campaigns))
        .route("/api/v1/dashboard", get(handlers::dashboard))
        .route(
            "/api/v1/projects/:id/progress",
            get(handlers::project_progress),
        )
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
}

/// Final app: health check plus `api`, with tracing and CORS.
///
/// The health route stays outside `api` so extra layers on the API (rate
/// limiting) never apply to it.
pub fn app(state: Arc<AppState>, api: Router<Arc<AppState>>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .merge(api)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
