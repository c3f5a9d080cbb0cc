//! API route assembly

use axum::{middleware, routing::get, Router};

use super::middleware::logging_middleware;
use super::state::AppState;
use super::{health, rag};

/// API routes without state, for composition with other route sets
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .nest("/rag", rag::create_rag_router())
}

/// Create the complete API router with state and middleware
pub fn create_api_router(state: AppState) -> Router {
    api_routes()
        .with_state(state)
        .layer(middleware::from_fn(logging_middleware))
        .layer(tower_http::trace::TraceLayer::new_for_http())
}
