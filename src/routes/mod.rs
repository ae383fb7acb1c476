pub mod estimates;
pub mod health;

use axum::{routing::get, routing::post, Router};
use std::sync::Arc;

use crate::app::AppState;

/// Build the API router with all routes
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        // Estimates
        .route("/estimates", post(estimates::create_estimate))
        .route("/estimates/ui", post(estimates::create_ui_estimate))
        .route("/estimates/compare", post(estimates::compare_grades))
        // Personality analysis only
        .route("/personality", post(estimates::analyze_personality))
}
