use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::state::AppState;

/// Create the API router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health
        .route("/health", get(handlers::health_check))

        // Advisory
        .route("/api/v1/query", post(handlers::handle_query))

        // Soil records (survey-number disambiguation)
        .route("/api/v1/farmers/{farmer_id}/soil-records", get(handlers::list_soil_records))

        // Artifact bundle status
        .route("/api/v1/artifacts/status", get(handlers::artifact_status))

        .with_state(state)
}
