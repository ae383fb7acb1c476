use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::app::AppState;
use crate::db;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub services: ServiceHealth,
}

#[derive(Serialize)]
pub struct ServiceHealth {
    pub database: String,
    pub legacy_engine: String,
}

/// `None` when the dependency is not configured
fn status_label(result: Option<bool>) -> &'static str {
    match result {
        Some(true) => "ok",
        Some(false) => "error",
        None => "disabled",
    }
}

/// Health check endpoint - public
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<HealthResponse>) {
    let db_check = async {
        match &state.db {
            Some(pool) => Some(db::health_check(pool).await),
            None => None,
        }
    };
    let legacy_check = async {
        match state.estimator.legacy_engine() {
            Some(engine) => Some(engine.health_check().await.is_ok()),
            None => None,
        }
    };
    let (db_ok, legacy_ok) = tokio::join!(db_check, legacy_check);

    // Database is critical for pricing; the legacy engine only degrades
    let status = match (db_ok, legacy_ok) {
        (Some(false), _) => "unhealthy",
        (_, Some(false)) => "degraded",
        _ => "healthy",
    };

    let status_code = if status == "unhealthy" {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };

    (
        status_code,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            services: ServiceHealth {
                database: status_label(db_ok).to_string(),
                legacy_engine: status_label(legacy_ok).to_string(),
            },
        }),
    )
}
