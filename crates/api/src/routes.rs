use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

/// Creates all API routes with state
pub fn create_api_routes(state: AppState) -> Router {
    Router::new()
        .route("/query/{term}", get(handlers::query))
        .route("/fquery/{term}", get(handlers::full_query))
        .route("/info", get(handlers::get_info))
        .route("/health", get(handlers::health_check))
        .with_state(state)
}
