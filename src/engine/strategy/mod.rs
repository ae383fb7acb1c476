//! Grade selection, process picking and budget planning.

pub mod budget;
pub mod grade;
pub mod process_picker;

use tracing::{error, info, instrument};

use crate::domain::legacy::LegacyProcessRequest;
use crate::domain::{Grade, PersonalityResult, Preferences, Space, SpaceInfo, StrategyResult};
use crate::engine::bridge;
use crate::error::{DelegateOperation, EstimateError};
use crate::services::LegacyEngine;

pub use budget::plan_budget;
pub use grade::select_grade;
pub use process_picker::{personality_match, pick_processes};

/// Build the strategy for one request.
///
/// With a legacy engine, its process recommendations are merged in after
/// the local ones; a failed legacy call is fatal.
#[instrument(skip_all, fields(selected_spaces = selected_spaces.len(), forced = ?forced_grade))]
pub async fn determine_strategy(
    personality: &PersonalityResult,
    space: &SpaceInfo,
    preferences: &Preferences,
    selected_spaces: &[Space],
    legacy_engine: Option<&dyn LegacyEngine>,
    forced_grade: Option<Grade>,
) -> Result<StrategyResult, EstimateError> {
    let (recommended_grade, grade_reason) =
        select_grade(&personality.trait_scores, space, preferences, forced_grade);

    let mut process_strategy = pick_processes(personality, selected_spaces);

    if let Some(engine) = legacy_engine {
        let request = LegacyProcessRequest {
            indicators: bridge::to_legacy(&personality.trait_scores),
            selected_spaces: selected_spaces.to_vec(),
            budget: preferences.budget.flexibility.as_str().to_string(),
        };
        let result = engine.analyze_process(&request).await.map_err(|e| {
            error!(error = %e, "Process delegation failed");
            EstimateError::DelegateEngine {
                operation: DelegateOperation::AnalyzeProcess,
                message: e.to_string(),
            }
        })?;
        let recommendations = bridge::process_items_from_legacy(&result, &personality.trait_scores);
        process_strategy = process_picker::merge_recommendations(process_strategy, recommendations);
    }

    let budget_strategy = plan_budget(&preferences.budget, &process_strategy);

    info!(
        grade = %recommended_grade,
        processes = process_strategy.len(),
        "Strategy determined"
    );

    Ok(StrategyResult {
        recommended_grade,
        grade_reason,
        process_strategy,
        budget_strategy,
    })
}
