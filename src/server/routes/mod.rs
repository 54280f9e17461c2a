//! API routes and handlers.

mod invoke;
mod readings;

use axum::{
    Router,
    routing::{get, post},
};

use super::state::AppState;

/// Build the API router.
pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Ledger lifecycle
        .route("/ledger/init", post(readings::init_ledger))
        // Readings
        .route("/readings", get(readings::list_readings))
        .route("/readings", post(readings::create_reading))
        .route("/readings/{id}", get(readings::get_reading))
        .route("/readings/{id}/exists", get(readings::reading_exists))
        // Raw contract invocation
        .route("/invoke/{function}", post(invoke::invoke_function));

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api_routes)
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}
