//! Presentation-safe projection of an estimate. Never fails.
//!
//! Only formats and filters: monetary figures are passed through untouched.

use crate::domain::{
    EstimateResult, Grade, LifestyleTag, PersonalityResult, PersonalityTag,
    ProcessBlock, RiskLevel, Space, StrategyResult, UiBreakdownRow, UiEstimate, UiLaborRow,
    UiMaterialRow, UiPersonalityMatch, UiTotal,
};

pub const DEFAULT_MATCH_SCORE: u32 = 50;
pub const BUFFER_WARNING_PERCENTAGE: f64 = 15.0;

pub const NO_SPACES_MESSAGE: &str = "No spaces selected. Choose the spaces you want to renovate.";
pub const NO_PROCESSES_MESSAGE: &str =
    "No processes selected for the chosen spaces. Pick at least one process.";
pub const GENERIC_FAILURE_MESSAGE: &str = "The estimate could not be calculated. Please try again.";

const PERSONALIZED_MESSAGE: &str = "This estimate reflects your answers and lifestyle.";
const GENERIC_MESSAGE: &str =
    "This is a general estimate. Answer the questionnaire for a personalized one.";

/// Whole-won KRW with thousands separators, e.g. `₩35,000,000`
pub fn format_krw(amount: f64) -> String {
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        format!("-₩{grouped}")
    } else {
        format!("₩{grouped}")
    }
}

fn format_quantity(quantity: f64, unit: &str) -> String {
    if quantity.fract() == 0.0 {
        format!("{quantity:.0} {unit}")
    } else {
        format!("{quantity:.1} {unit}")
    }
}

fn personality_message(has_personality_data: bool) -> String {
    if has_personality_data {
        PERSONALIZED_MESSAGE
    } else {
        GENERIC_MESSAGE
    }
    .to_string()
}

/// Highlights keyed off classification tags
pub fn highlights(personality: &PersonalityResult) -> Vec<String> {
    let types = &personality.classified_types;
    let mut out = Vec::new();
    if types.lifestyle.contains(&LifestyleTag::RemoteWork) {
        out.push("Home-office environment optimized".to_string());
    }
    if types.has_children() {
        out.push("Child safety considered".to_string());
    }
    if types.personality.contains(&PersonalityTag::CleanOriented) {
        out.push("Easy-clean finishes emphasized".to_string());
    }
    out
}

pub fn warnings(personality: &PersonalityResult) -> Vec<String> {
    let risk = &personality.risk_assessment;
    let mut out = Vec::new();
    if risk.level == RiskLevel::High {
        out.push("High risk level: secure a sufficient contingency reserve.".to_string());
    }
    if risk.buffer_percentage >= BUFFER_WARNING_PERCENTAGE {
        out.push(format!(
            "A contingency of {:.0}% is recommended.",
            risk.buffer_percentage
        ));
    }
    out
}

/// Blocks shown for the selection: common work, intersecting blocks, or
/// everything when nothing was selected
fn is_visible(block: &ProcessBlock, selected: &[Space]) -> bool {
    selected.is_empty()
        || block.spaces.contains(&Space::Common)
        || block.spaces.iter().any(|s| selected.contains(s))
}

fn breakdown_row(block: &ProcessBlock, grand_total: f64) -> UiBreakdownRow {
    let percentage = if grand_total > 0.0 {
        (block.process_total / grand_total * 100.0).round() as u32
    } else {
        0
    };

    UiBreakdownRow {
        process_id: block.process.as_str().to_string(),
        process_name: block.process_name.clone(),
        amount: format_krw(block.process_total),
        percentage,
        materials: block
            .materials
            .iter()
            .map(|m| UiMaterialRow {
                name: m.name.clone(),
                quantity: format_quantity(m.quantity, &m.unit),
                unit_price: format_krw(m.unit_price),
                total_price: format_krw(m.total_price),
            })
            .collect(),
        labor: Some(UiLaborRow {
            labor_type: block.labor.labor_type.display_name().to_string(),
            amount: format_krw(block.labor.total_cost),
        }),
    }
}

fn match_score(blocks: &[&ProcessBlock], strategy: &StrategyResult) -> u32 {
    let matches: Vec<f64> = blocks
        .iter()
        .filter_map(|b| {
            strategy
                .process_strategy
                .iter()
                .find(|i| i.process == b.process)
                .map(|i| i.personality_match)
        })
        .collect();

    if matches.is_empty() {
        return DEFAULT_MATCH_SCORE;
    }
    (matches.iter().sum::<f64>() / matches.len() as f64 * 100.0)
        .round()
        .clamp(0.0, 100.0) as u32
}

/// Failed projection with zeroed totals
pub fn failed(
    grade: Grade,
    message: impl Into<String>,
    personality: Option<&PersonalityResult>,
) -> UiEstimate {
    let has_personality_data = personality.is_some_and(|p| p.trait_scores.has_confident_scores());
    UiEstimate {
        is_success: false,
        grade,
        grade_name: grade.display_name().to_string(),
        grade_description: grade.description().to_string(),
        price_multiplier: grade.price_multiplier(),
        total: UiTotal::zeroed(),
        breakdown: Vec::new(),
        personality_match: UiPersonalityMatch {
            score: 0,
            highlights: Vec::new(),
        },
        warnings: Vec::new(),
        error_message: Some(message.into()),
        has_personality_data,
        personality_based_message: personality_message(has_personality_data),
    }
}

pub fn adapt(
    estimate: &EstimateResult,
    personality: &PersonalityResult,
    strategy: &StrategyResult,
    selected_spaces: &[Space],
) -> UiEstimate {
    let grade = estimate.meta.grade;

    let summary = match (&estimate.summary, estimate.is_success()) {
        (Some(summary), true) => summary,
        _ => {
            let message = estimate
                .failure
                .as_ref()
                .and_then(|f| f.reasons.first().cloned())
                .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string());
            return failed(grade, message, Some(personality));
        }
    };

    let visible: Vec<&ProcessBlock> = estimate
        .breakdown
        .iter()
        .filter(|b| is_visible(b, selected_spaces))
        .collect();

    if visible.is_empty() {
        let message = if selected_spaces.is_empty() {
            NO_SPACES_MESSAGE
        } else {
            NO_PROCESSES_MESSAGE
        };
        return failed(grade, message, Some(personality));
    }

    let has_personality_data = personality.trait_scores.has_confident_scores();

    UiEstimate {
        is_success: true,
        grade,
        grade_name: grade.display_name().to_string(),
        grade_description: grade.description().to_string(),
        price_multiplier: grade.price_multiplier(),
        total: UiTotal {
            amount: summary.grand_total,
            formatted: format_krw(summary.grand_total),
            with_buffer: format_krw(summary.total_with_buffer),
            per_area: format_krw(summary.cost_per_area),
        },
        breakdown: visible
            .iter()
            .map(|b| breakdown_row(b, summary.grand_total))
            .collect(),
        personality_match: UiPersonalityMatch {
            score: match_score(&visible, strategy),
            highlights: highlights(personality),
        },
        warnings: warnings(personality),
        error_message: None,
        has_personality_data,
        personality_based_message: personality_message(has_personality_data),
    }
}
