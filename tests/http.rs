mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use renovation_estimator::app::{create_app, AppState};
use renovation_estimator::config::{Environment, PricingSource, Settings};
use renovation_estimator::domain::Space;
use renovation_estimator::engine::Estimator;
use renovation_estimator::services::InMemoryCatalog;

fn app() -> axum::Router {
    let settings = Settings {
        env: Environment::Dev,
        server_addr: "127.0.0.1:0".into(),
        pricing_source: PricingSource::Memory,
        pricing_timeout_ms: 2_000,
        pricing_max_retries: 2,
        pricing_retry_budget_ms: 5_000,
        database_url: None,
        database_max_connections: 1,
        cors_allow_origins: vec!["http://localhost:3000".into()],
        legacy_engine: None,
    };
    let estimator = Estimator::from_catalog(InMemoryCatalog::seeded());
    create_app(AppState::new(None, settings, estimator))
}

fn post_json(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn health_reports_disabled_dependencies() {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let json = json_body(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["services"]["database"], "disabled");
    assert_eq!(json["services"]["legacy_engine"], "disabled");
}

#[tokio::test]
async fn estimate_is_wrapped_in_data() {
    let input = common::input(34.0, 40_000_000.0, &[Space::Kitchen]);
    let response = app()
        .oneshot(post_json("/estimates", serde_json::to_string(&input).unwrap()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["data"]["status"], "success");
    assert_eq!(json["data"]["breakdown"][0]["processId"], "kitchen-core");
    assert!(json["data"]["summary"]["grandTotal"].as_f64().unwrap() > 0.0);
}

#[tokio::test]
async fn invalid_input_is_a_bad_request() {
    let input = common::input(0.0, 40_000_000.0, &[Space::Kitchen]);
    let response = app()
        .oneshot(post_json("/estimates", serde_json::to_string(&input).unwrap()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = json_body(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["message"].as_str().unwrap().contains("floor area"));
}

#[tokio::test]
async fn ui_estimate_honours_the_grade_query() {
    let input = common::input(34.0, 10_000_000.0, &[Space::Kitchen]);
    let response = app()
        .oneshot(post_json(
            "/estimates/ui?grade=premium",
            serde_json::to_string(&input).unwrap(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["data"]["isSuccess"], true);
    assert_eq!(json["data"]["grade"], "premium");
    assert_eq!(json["data"]["gradeName"], "Opus");
    assert_eq!(json["data"]["gradeDescription"], "Premium, tailored finishes");
    assert_eq!(json["data"]["priceMultiplier"], 1.25);
    assert!(json["data"]["total"]["formatted"]
        .as_str()
        .unwrap()
        .starts_with('₩'));
}

#[tokio::test]
async fn ui_estimate_reports_failure_with_ok_status() {
    let input = common::input(34.0, 40_000_000.0, &[]);
    let response = app()
        .oneshot(post_json("/estimates/ui", serde_json::to_string(&input).unwrap()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["data"]["isSuccess"], false);
    assert!(json["data"]["errorMessage"].is_string());
}

#[tokio::test]
async fn compare_returns_every_grade() {
    let input = common::input(34.0, 40_000_000.0, &[Space::Bathroom]);
    let response = app()
        .oneshot(post_json("/estimates/compare", serde_json::to_string(&input).unwrap()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    for grade in ["entry", "standard", "premium"] {
        assert_eq!(json["data"][grade]["grade"], grade);
    }
}

#[tokio::test]
async fn personality_uses_the_fallback_profile_without_an_engine() {
    let input = common::input(34.0, 40_000_000.0, &[Space::Kitchen]);
    let response = app()
        .oneshot(post_json("/personality", serde_json::to_string(&input).unwrap()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["data"]["traitScores"].as_object().unwrap().len(), 18);
    assert_eq!(json["data"]["riskAssessment"]["level"], "low");
}
