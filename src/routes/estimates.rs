use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::DataResponse;
use crate::app::AppState;
use crate::domain::{
    EstimateInput, EstimateResult, Grade, GradeComparison, PersonalityResult, UiEstimate,
};
use crate::error::ApiResult;
use crate::middleware::RequestIdExt;

#[derive(Debug, Deserialize)]
pub struct UiEstimateQuery {
    /// Forces a grade, bypassing the grade heuristics
    pub grade: Option<Grade>,
}

/// Raw itemized estimate; 400 on malformed input
pub async fn create_estimate(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(input): Json<EstimateInput>,
) -> ApiResult<DataResponse<EstimateResult>> {
    tracing::info!(
        request_id = headers.request_id().unwrap_or("-"),
        floor_area = input.space_info.floor_area,
        selected_spaces = input.selected_spaces.len(),
        "Calculating estimate"
    );

    let result = state.estimator.calculate_estimate(&input).await?;
    Ok(DataResponse::new(result))
}

/// Presentation estimate; failures are reported inside the body
pub async fn create_ui_estimate(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<UiEstimateQuery>,
    Json(input): Json<EstimateInput>,
) -> DataResponse<UiEstimate> {
    tracing::info!(
        request_id = headers.request_id().unwrap_or("-"),
        forced_grade = ?query.grade,
        "Calculating UI estimate"
    );

    DataResponse::new(
        state
            .estimator
            .calculate_estimate_for_ui(&input, query.grade)
            .await,
    )
}

/// What-if estimates for every grade
pub async fn compare_grades(
    State(state): State<Arc<AppState>>,
    Json(input): Json<EstimateInput>,
) -> DataResponse<GradeComparison> {
    tracing::info!("Comparing grades");

    DataResponse::new(state.estimator.compare_grades(&input).await)
}

pub async fn analyze_personality(
    State(state): State<Arc<AppState>>,
    Json(input): Json<EstimateInput>,
) -> ApiResult<DataResponse<PersonalityResult>> {
    let personality = state.estimator.analyze_personality(&input).await?;
    Ok(DataResponse::new(personality))
}
