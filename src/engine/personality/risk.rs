//! Two-phase risk assessment.
//!
//! `estimate_risk_preliminary` runs during personality analysis and cannot
//! fail. `refine_risk_with_strategy` asks the legacy engine once a process
//! strategy exists; a failure there aborts the estimate.

use tracing::{error, instrument};

use crate::domain::{
    BudgetFlexibility, ClassifiedTypes, DecisionMode, Preferences, RiskAssessment, RiskLevel,
    SpaceInfo, StrategyResult, TraitProfile, MAX_BUFFER_PERCENTAGE,
};
use crate::domain::legacy::LegacyRiskRequest;
use crate::engine::bridge;
use crate::error::{DelegateOperation, EstimateError};
use crate::services::LegacyEngine;

pub const BASE_RISK_SCORE: u32 = 20;
pub const OLD_BUILDING_AGE: u32 = 20;
pub const LARGE_FAMILY_SIZE: u32 = 5;

pub const TIGHT_BUDGET: &str = "tight_budget";
pub const OLD_BUILDING: &str = "old_building";
pub const LARGE_FAMILY: &str = "large_family";
pub const JOINT_DECISION: &str = "joint_decision";

fn regret_points(risk: &str) -> u32 {
    match risk {
        TIGHT_BUDGET => 15,
        OLD_BUILDING => 25,
        LARGE_FAMILY | JOINT_DECISION => 10,
        _ => 0,
    }
}

/// Risks the customer is likely to regret not budgeting for
pub fn regret_risks(
    classified: &ClassifiedTypes,
    preferences: &Preferences,
    space: &SpaceInfo,
) -> Vec<String> {
    let mut risks = Vec::new();
    if preferences.budget.flexibility == BudgetFlexibility::Strict {
        risks.push(TIGHT_BUDGET.to_string());
    }
    if space.building_age.is_some_and(|age| age >= OLD_BUILDING_AGE) {
        risks.push(OLD_BUILDING.to_string());
    }
    if preferences.family.total_people >= LARGE_FAMILY_SIZE {
        risks.push(LARGE_FAMILY.to_string());
    }
    if classified.decision == DecisionMode::Joint {
        risks.push(JOINT_DECISION.to_string());
    }
    risks
}

pub fn level_from_preliminary_score(score: u32) -> RiskLevel {
    match score {
        s if s >= 50 => RiskLevel::High,
        s if s >= 30 => RiskLevel::Medium,
        _ => RiskLevel::Low,
    }
}

pub fn level_from_refined_score(score: u32) -> RiskLevel {
    match score {
        s if s >= 50 => RiskLevel::High,
        s if s >= 25 => RiskLevel::Medium,
        _ => RiskLevel::Low,
    }
}

/// Contingency percentage, always within [0, 20]
pub fn buffer_percentage(level: RiskLevel, regret_count: usize) -> f64 {
    let level_add = match level {
        RiskLevel::Low => 0.0,
        RiskLevel::Medium => 3.0,
        RiskLevel::High => 5.0,
    };
    (5.0 + level_add + 2.0 * regret_count as f64).clamp(0.0, MAX_BUFFER_PERCENTAGE)
}

pub fn estimate_risk_preliminary(
    classified: &ClassifiedTypes,
    preferences: &Preferences,
    space: &SpaceInfo,
) -> RiskAssessment {
    let triggered_risks = regret_risks(classified, preferences, space);
    let total_score = BASE_RISK_SCORE
        + triggered_risks
            .iter()
            .map(|r| regret_points(r))
            .sum::<u32>();
    let level = level_from_preliminary_score(total_score);

    RiskAssessment {
        total_score,
        level,
        buffer_percentage: buffer_percentage(level, triggered_risks.len()),
        triggered_risks,
    }
}

#[instrument(skip_all)]
pub async fn refine_risk_with_strategy(
    engine: &dyn LegacyEngine,
    profile: &TraitProfile,
    classified: &ClassifiedTypes,
    strategy: &StrategyResult,
    preferences: &Preferences,
    space: &SpaceInfo,
) -> Result<RiskAssessment, EstimateError> {
    let request = LegacyRiskRequest {
        adjusted_indicators: bridge::to_legacy(profile),
        process_result: bridge::process_result_to_legacy(&strategy.process_strategy),
        space_info: bridge::legacy_space_info(space),
    };

    let result = engine.analyze_risk(&request).await.map_err(|e| {
        error!(error = %e, "Risk refinement failed");
        EstimateError::DelegateEngine {
            operation: DelegateOperation::AnalyzeRisk,
            message: e.to_string(),
        }
    })?;

    let regrets = regret_risks(classified, preferences, space);
    Ok(bridge::risk_from_legacy(&result, &regrets))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Budget, Family, HousingType, Lifestyle, Purpose};

    fn preferences(flexibility: BudgetFlexibility, total_people: u32) -> Preferences {
        Preferences {
            budget: Budget {
                min: 10_000_000.0,
                max: 30_000_000.0,
                flexibility,
            },
            family: Family {
                total_people,
                has_infant: false,
                has_child: false,
                has_elderly: false,
                has_pet: false,
            },
            lifestyle: Lifestyle::default(),
            purpose: Purpose::Live,
        }
    }

    fn space(building_age: Option<u32>) -> SpaceInfo {
        SpaceInfo {
            housing_type: HousingType::Apartment,
            floor_area: 24.0,
            rooms: 2,
            bathrooms: 1,
            building_age,
            floor: Some(7),
        }
    }

    #[test]
    fn calm_household_is_low_risk() {
        let risk = estimate_risk_preliminary(
            &ClassifiedTypes::default(),
            &preferences(BudgetFlexibility::Flexible, 1),
            &space(Some(5)),
        );
        assert_eq!(risk.total_score, BASE_RISK_SCORE);
        assert_eq!(risk.level, RiskLevel::Low);
        assert!(risk.triggered_risks.is_empty());
        assert_eq!(risk.buffer_percentage, 5.0);
    }

    #[test]
    fn every_regret_risk_stacks() {
        let classified = ClassifiedTypes {
            decision: DecisionMode::Joint,
            ..Default::default()
        };
        let risk = estimate_risk_preliminary(
            &classified,
            &preferences(BudgetFlexibility::Strict, 6),
            &space(Some(32)),
        );

        assert_eq!(risk.total_score, 80);
        assert_eq!(risk.level, RiskLevel::High);
        assert_eq!(
            risk.triggered_risks,
            vec![TIGHT_BUDGET, OLD_BUILDING, LARGE_FAMILY, JOINT_DECISION]
        );
        // 5 + 5 + 2 * 4
        assert_eq!(risk.buffer_percentage, 18.0);
    }

    #[test]
    fn tight_budget_alone_is_medium() {
        let risk = estimate_risk_preliminary(
            &ClassifiedTypes::default(),
            &preferences(BudgetFlexibility::Strict, 1),
            &space(None),
        );
        assert_eq!(risk.total_score, 35);
        assert_eq!(risk.level, RiskLevel::Medium);
        assert_eq!(risk.buffer_percentage, 10.0);
    }

    #[test]
    fn buffer_never_exceeds_cap() {
        for count in 0..50 {
            for level in [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High] {
                let buffer = buffer_percentage(level, count);
                assert!((0.0..=MAX_BUFFER_PERCENTAGE).contains(&buffer));
            }
        }
    }
}
