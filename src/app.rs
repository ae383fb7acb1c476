use axum::{http::HeaderValue, Router};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::config::Settings;
use crate::engine::Estimator;
use crate::middleware::{request_id_layer, X_REQUEST_ID};
use crate::routes;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Present only when prices come from PostgreSQL
    pub db: Option<PgPool>,
    pub settings: Settings,
    pub estimator: Estimator,
}

impl AppState {
    pub fn new(db: Option<PgPool>, settings: Settings, estimator: Estimator) -> Arc<Self> {
        Arc::new(Self {
            db,
            settings,
            estimator,
        })
    }
}

/// Build the complete application with all middleware
pub fn create_app(state: Arc<AppState>) -> Router {
    let cors = build_cors_layer(&state.settings);

    // Spans at DEBUG to keep INFO output to one line per estimate
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(DefaultOnResponse::new().level(Level::DEBUG));

    let (set_request_id, propagate_request_id) = request_id_layer();

    // Middleware stack (applied bottom-up)
    Router::new()
        .merge(routes::api_router())
        .layer(propagate_request_id)
        .layer(trace_layer)
        .layer(set_request_id)
        .layer(cors)
        .with_state(state)
}

fn build_cors_layer(settings: &Settings) -> CorsLayer {
    let origins: Vec<HeaderValue> = settings
        .cors_allow_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let max_age = if settings.env.is_dev() {
        std::time::Duration::from_secs(86400)
    } else {
        std::time::Duration::from_secs(3600)
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(AllowMethods::list([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
            axum::http::HeaderName::from_static(X_REQUEST_ID),
        ]))
        .max_age(max_age)
}
