use tracing::{debug, warn};

use crate::domain::{SpaceInfo, TraitCode, TraitProfile, TraitScore, UserAnswer, NEUTRAL_TRAIT_SCORE};
use crate::engine::bridge;
use crate::services::LegacyEngine;

/// Confidence attached to the fallback vector
pub const FALLBACK_CONFIDENCE: f64 = 0.3;

/// Every trait neutral, low confidence
pub fn fallback_profile() -> TraitProfile {
    TraitCode::ALL
        .into_iter()
        .map(|code| TraitScore::new(code, i64::from(NEUTRAL_TRAIT_SCORE), FALLBACK_CONFIDENCE))
        .collect()
}

/// Score traits through the legacy engine. Falls back instead of failing.
pub async fn score_traits(
    engine: Option<&dyn LegacyEngine>,
    answers: &[UserAnswer],
    space: &SpaceInfo,
) -> TraitProfile {
    let Some(engine) = engine else {
        debug!("No legacy engine configured, using fallback traits");
        return fallback_profile();
    };

    let request = bridge::legacy_trait_request(answers, space);
    match engine.analyze_traits(&request).await {
        Ok(result) => {
            let profile = bridge::from_legacy(&result);
            if profile.is_empty() {
                warn!("Legacy engine returned no known indicators, using fallback traits");
                return fallback_profile();
            }
            debug!(traits = profile.len(), "Trait scores from legacy engine");
            profile
        }
        Err(e) => {
            warn!(error = %e, "Trait scoring failed, using fallback traits");
            fallback_profile()
        }
    }
}
