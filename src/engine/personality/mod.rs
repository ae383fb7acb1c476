//! Personality analysis: trait scores, tags, preliminary risk and problem
//! classification.

pub mod classifier;
pub mod risk;
pub mod trait_scorer;

use chrono::Utc;
use tracing::{info, instrument};

use crate::domain::{
    ClassifiedTypes, PersonalityResult, Preferences, ProblemClassification, SpaceInfo,
    UserAnswer,
};
use crate::services::LegacyEngine;

pub use classifier::classify;
pub use risk::{estimate_risk_preliminary, refine_risk_with_strategy};
pub use trait_scorer::{fallback_profile, score_traits};

/// Location vs space pain; the current model always points at the space
pub fn classify_problem(_classified: &ClassifiedTypes, _preferences: &Preferences) -> ProblemClassification {
    ProblemClassification {
        location_score: 0.3,
        space_score: 0.7,
        recommendation: "remodel".to_string(),
        message: "Your current home can be improved through renovation.".to_string(),
    }
}

#[instrument(skip_all, fields(answers = answers.len(), floor_area = space.floor_area))]
pub async fn analyze(
    engine: Option<&dyn LegacyEngine>,
    answers: &[UserAnswer],
    space: &SpaceInfo,
    preferences: &Preferences,
) -> PersonalityResult {
    let trait_scores = score_traits(engine, answers, space).await;
    let classified_types = classify(&trait_scores, preferences);
    let risk_assessment = estimate_risk_preliminary(&classified_types, preferences, space);
    let problem_classification = classify_problem(&classified_types, preferences);

    info!(
        risk_level = ?risk_assessment.level,
        tags = classified_types.tag_count(),
        "Personality analysis complete"
    );

    PersonalityResult {
        trait_scores,
        classified_types,
        risk_assessment,
        problem_classification,
        analyzed_at: Utc::now(),
    }
}
