use serde::{Deserialize, Serialize};

use super::strategy::Grade;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UiTotal {
    pub amount: f64,
    pub formatted: String,
    pub with_buffer: String,
    pub per_area: String,
}

impl UiTotal {
    pub fn zeroed() -> Self {
        Self {
            amount: 0.0,
            formatted: "-".to_string(),
            with_buffer: "-".to_string(),
            per_area: "-".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UiMaterialRow {
    pub name: String,
    pub quantity: String,
    pub unit_price: String,
    pub total_price: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UiLaborRow {
    #[serde(rename = "type")]
    pub labor_type: String,
    pub amount: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UiBreakdownRow {
    pub process_id: String,
    pub process_name: String,
    pub amount: String,
    pub percentage: u32,
    pub materials: Vec<UiMaterialRow>,
    pub labor: Option<UiLaborRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UiPersonalityMatch {
    /// 0-100
    pub score: u32,
    pub highlights: Vec<String>,
}

/// Presentation-safe estimate; producing one never fails
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UiEstimate {
    pub is_success: bool,
    pub grade: Grade,
    pub grade_name: String,
    pub grade_description: String,
    /// Indicative price level relative to the standard grade
    pub price_multiplier: f64,
    pub total: UiTotal,
    pub breakdown: Vec<UiBreakdownRow>,
    pub personality_match: UiPersonalityMatch,
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub has_personality_data: bool,
    pub personality_based_message: String,
}

/// What-if estimates for every grade
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeComparison {
    pub entry: UiEstimate,
    pub standard: UiEstimate,
    pub premium: UiEstimate,
}
