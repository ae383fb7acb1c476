//! Translation between the modern vocabulary and the legacy engine's.
//!
//! Nothing outside this module reads or writes legacy labels. Legacy
//! indicators are 0-100 and keyed by label; modern scores are 1-10 and keyed
//! by `TraitCode`.

use std::collections::BTreeMap;
use tracing::warn;

use crate::domain::legacy::{
    LegacyGrade, LegacyIndicators, LegacyPriority, LegacyProcessRecommendation,
    LegacyProcessResult, LegacyRiskResult, LegacySeverity, LegacySpaceInfo, LegacyTraitRequest,
    LegacyTraitResult,
};
use crate::domain::{
    Grade, Priority, ProcessId, ProcessStrategyItem, RiskAssessment, SpaceInfo, TraitCode,
    TraitProfile, TraitScore, UserAnswer,
};
use crate::engine::personality::risk::{buffer_percentage, level_from_refined_score};
use crate::engine::strategy::personality_match;

/// Value assumed for a required legacy indicator nobody supplied
pub const LEGACY_NEUTRAL_INDICATOR: f64 = 50.0;

pub const CONFIDENCE_WITH_PRIORITIES: f64 = 0.85;
pub const CONFIDENCE_WITHOUT_PRIORITIES: f64 = 0.7;

/// Labels the legacy engine refuses to run without
pub const REQUIRED_LEGACY_LABELS: [&str; 12] = [
    "수납중요도",
    "동선중요도",
    "조명취향",
    "소음민감도",
    "관리민감도",
    "스타일고집도",
    "색감취향",
    "가족영향도",
    "반려동물영향도",
    "예산탄력성",
    "공사복잡도수용성",
    "집값방어의식",
];

pub fn legacy_label(code: TraitCode) -> &'static str {
    match code {
        TraitCode::StorageImportance => "수납중요도",
        TraitCode::FlowImportance => "동선중요도",
        TraitCode::LightImportance => "조명취향",
        TraitCode::NoiseSensitivity => "소음민감도",
        TraitCode::CleaningPreference => "관리민감도",
        TraitCode::StylePreference => "스타일고집도",
        TraitCode::ColorPreference => "색감취향",
        TraitCode::FamilyImpact => "가족영향도",
        TraitCode::PetFriendly => "반려동물영향도",
        TraitCode::BudgetFlexibility => "예산탄력성",
        TraitCode::ComplexityTolerance => "공사복잡도수용성",
        TraitCode::ValueProtection => "집값방어의식",
        TraitCode::OrganizationHabit => "정리습관",
        TraitCode::CookingFrequency => "요리빈도",
        TraitCode::GuestFrequency => "손님빈도",
        TraitCode::WorkFromHome => "재택근무",
        TraitCode::ChildSafety => "아이안전",
        TraitCode::ElderlyCare => "노인배려",
    }
}

pub fn trait_from_label(label: &str) -> Option<TraitCode> {
    TraitCode::ALL
        .into_iter()
        .find(|code| legacy_label(*code) == label)
}

/// Modern profile → legacy indicators (1-10 → 0-100)
pub fn to_legacy(profile: &TraitProfile) -> LegacyIndicators {
    let mut indicators: LegacyIndicators = profile
        .iter()
        .map(|s| (legacy_label(s.code).to_string(), f64::from(s.score) * 10.0))
        .collect();

    for label in REQUIRED_LEGACY_LABELS {
        indicators
            .entry(label.to_string())
            .or_insert(LEGACY_NEUTRAL_INDICATOR);
    }
    indicators
}

/// Legacy trait result → modern profile (0-100 → 1-10)
pub fn from_legacy(result: &LegacyTraitResult) -> TraitProfile {
    let confidence = if result.priority_areas.is_empty() {
        CONFIDENCE_WITHOUT_PRIORITIES
    } else {
        CONFIDENCE_WITH_PRIORITIES
    };

    result
        .indicators
        .iter()
        .filter_map(|(label, value)| match trait_from_label(label) {
            Some(code) => Some(TraitScore::new(code, (value / 10.0).round() as i64, confidence)),
            None => {
                warn!(label = %label, "Dropping unknown legacy indicator");
                None
            }
        })
        .collect()
}

pub fn legacy_space_info(space: &SpaceInfo) -> LegacySpaceInfo {
    LegacySpaceInfo {
        housing_type: space.housing_type,
        pyeong: space.floor_area,
        rooms: space.rooms,
        bathrooms: space.bathrooms,
        building_age: space.building_age.unwrap_or(0),
        floor: space.floor,
    }
}

pub fn legacy_trait_request(answers: &[UserAnswer], space: &SpaceInfo) -> LegacyTraitRequest {
    let answers: BTreeMap<String, String> = answers
        .iter()
        .map(|a| (a.question_id.clone(), a.answer_id.clone()))
        .collect();
    LegacyTraitRequest {
        answers,
        space_info: legacy_space_info(space),
    }
}

pub fn grade_to_legacy(grade: Grade) -> LegacyGrade {
    match grade {
        Grade::Entry => LegacyGrade::Basic,
        Grade::Standard => LegacyGrade::Argen,
        Grade::Premium => LegacyGrade::Premium,
    }
}

/// Exact alias first, then the broader family
pub fn grade_from_legacy(code: LegacyGrade) -> Grade {
    Grade::ALL
        .into_iter()
        .find(|g| grade_to_legacy(*g) == code)
        .unwrap_or(match code {
            LegacyGrade::Basic => Grade::Entry,
            LegacyGrade::Standard | LegacyGrade::Argen => Grade::Standard,
            LegacyGrade::Premium => Grade::Premium,
        })
}

pub fn severity_points(severity: LegacySeverity) -> u32 {
    match severity {
        LegacySeverity::Low => 10,
        LegacySeverity::Medium => 25,
        LegacySeverity::High => 50,
    }
}

pub fn priority_from_legacy(priority: &LegacyPriority) -> Priority {
    match priority {
        LegacyPriority::Score(n) if *n >= 8.0 => Priority::Must,
        LegacyPriority::Score(n) if *n >= 5.0 => Priority::Recommended,
        LegacyPriority::Score(_) => Priority::Optional,
        LegacyPriority::Label(label) => match label.trim().to_lowercase().as_str() {
            "essential" | "required" | "high" => Priority::Must,
            "recommended" | "suggested" | "medium" => Priority::Recommended,
            _ => Priority::Optional,
        },
    }
}

fn priority_to_legacy(priority: Priority) -> LegacyPriority {
    LegacyPriority::Label(
        match priority {
            Priority::Must => "essential",
            Priority::Recommended => "recommended",
            Priority::Optional => "optional",
        }
        .to_string(),
    )
}

/// `None` for process ids outside the closed set
pub fn process_item_from_legacy(
    recommendation: &LegacyProcessRecommendation,
    profile: &TraitProfile,
) -> Option<ProcessStrategyItem> {
    let process: ProcessId = match recommendation.id.parse() {
        Ok(process) => process,
        Err(_) => {
            warn!(process = %recommendation.id, "Dropping unknown legacy process");
            return None;
        }
    };

    Some(ProcessStrategyItem {
        process,
        priority: priority_from_legacy(&recommendation.priority),
        reason: recommendation.reason.clone().unwrap_or_default(),
        personality_match: personality_match(process, profile),
    })
}

pub fn process_items_from_legacy(
    result: &LegacyProcessResult,
    profile: &TraitProfile,
) -> Vec<ProcessStrategyItem> {
    result
        .recommended_processes
        .iter()
        .filter_map(|rec| process_item_from_legacy(rec, profile))
        .collect()
}

/// Current strategy in the shape the legacy risk engine expects
pub fn process_result_to_legacy(items: &[ProcessStrategyItem]) -> LegacyProcessResult {
    LegacyProcessResult {
        recommended_processes: items
            .iter()
            .map(|item| LegacyProcessRecommendation {
                id: item.process.as_str().replace('-', "_"),
                priority: priority_to_legacy(item.priority),
                reason: Some(item.reason.clone()),
            })
            .collect(),
    }
}

/// Legacy risk result merged with the locally detected regret risks
pub fn risk_from_legacy(result: &LegacyRiskResult, regret_risks: &[String]) -> RiskAssessment {
    let base = result
        .risks
        .first()
        .map(|r| severity_points(r.level))
        .unwrap_or(10);
    let total_score = base + 10 * result.risks.len() as u32;
    let level = level_from_refined_score(total_score);

    let triggered_risks = result
        .risks
        .iter()
        .map(|r| r.id.clone())
        .chain(regret_risks.iter().cloned())
        .collect();

    RiskAssessment {
        total_score,
        level,
        triggered_risks,
        buffer_percentage: buffer_percentage(level, regret_risks.len()),
    }
}
