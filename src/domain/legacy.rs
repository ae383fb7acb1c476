//! Wire types spoken by the legacy scoring engine.
//!
//! Only `engine::bridge` converts between these and the modern types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::input::{HousingType, Space};

/// Legacy trait indicators: label -> score in [0,100]
pub type LegacyIndicators = BTreeMap<String, f64>;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacySpaceInfo {
    pub housing_type: HousingType,
    pub pyeong: f64,
    pub rooms: u32,
    pub bathrooms: u32,
    pub building_age: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floor: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyTraitRequest {
    /// questionId -> answerId
    pub answers: BTreeMap<String, String>,
    pub space_info: LegacySpaceInfo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyTraitResult {
    pub indicators: LegacyIndicators,
    #[serde(default)]
    pub priority_areas: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyProcessRequest {
    pub indicators: LegacyIndicators,
    pub selected_spaces: Vec<Space>,
    pub budget: String,
}

/// Legacy priorities arrive either as labels or as 0-10 numbers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum LegacyPriority {
    Score(f64),
    Label(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyProcessRecommendation {
    pub id: String,
    pub priority: LegacyPriority,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyProcessResult {
    #[serde(default)]
    pub recommended_processes: Vec<LegacyProcessRecommendation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyRiskRequest {
    pub adjusted_indicators: LegacyIndicators,
    pub process_result: LegacyProcessResult,
    pub space_info: LegacySpaceInfo,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LegacySeverity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyRisk {
    pub id: String,
    pub level: LegacySeverity,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LegacyRiskResult {
    #[serde(default)]
    pub risks: Vec<LegacyRisk>,
}

/// Four-tier grade codes of the legacy catalog
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum LegacyGrade {
    Basic,
    Standard,
    Argen,
    Premium,
}
