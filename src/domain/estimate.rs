use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::input::Space;
use super::strategy::{Grade, ProcessId};

pub const ESTIMATE_VERSION: &str = "4.1.0";

/// Process identifiers as the pricing catalog knows them
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PricingProcess {
    Finish,
    Kitchen,
    Bathroom,
    Storage,
    Electric,
    Window,
    Door,
    Demolition,
}

impl PricingProcess {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Finish => "finish",
            Self::Kitchen => "kitchen",
            Self::Bathroom => "bathroom",
            Self::Storage => "storage",
            Self::Electric => "electric",
            Self::Window => "window",
            Self::Door => "door",
            Self::Demolition => "demolition",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Finish => "Finishing",
            Self::Kitchen => "Kitchen",
            Self::Bathroom => "Bathroom",
            Self::Storage => "Storage",
            Self::Electric => "Lighting & electrical",
            Self::Window => "Windows",
            Self::Door => "Doors",
            Self::Demolition => "Demolition",
        }
    }
}

impl fmt::Display for PricingProcess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a cost line's figures came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DataOrigin {
    Db,
    Fallback,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MaterialItem {
    pub material_id: String,
    pub name: String,
    pub unit: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub total_price: f64,
    pub origin: DataOrigin,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LaborItem {
    pub labor_type: PricingProcess,
    pub daily_output: f64,
    pub crew_size: u32,
    pub rate_per_person_day: f64,
    pub total_days: u32,
    pub total_cost: f64,
    pub origin: DataOrigin,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProcessBlock {
    #[serde(rename = "processId")]
    pub process: ProcessId,
    pub process_name: String,
    pub spaces: Vec<Space>,
    pub materials: Vec<MaterialItem>,
    pub labor: LaborItem,
    pub material_subtotal: f64,
    pub labor_subtotal: f64,
    pub process_total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EstimateSummary {
    pub material_total: f64,
    pub labor_total: f64,
    pub grand_total: f64,
    pub vat_amount: f64,
    pub buffer_amount: f64,
    pub total_with_buffer: f64,
    pub cost_per_area: f64,
}

/// Pipeline stage at which an estimate was abandoned
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    InputValidation,
    ScopeSelection,
    ProcessDelegation,
    RiskRefinement,
    LaborLookup,
    Validation,
}

impl FailureStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InputValidation => "input_validation",
            Self::ScopeSelection => "scope_selection",
            Self::ProcessDelegation => "process_delegation",
            Self::RiskRefinement => "risk_refinement",
            Self::LaborLookup => "labor_lookup",
            Self::Validation => "validation",
        }
    }
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EstimateFailure {
    pub failed_processes: Vec<ProcessId>,
    pub reasons: Vec<String>,
    pub stage: FailureStage,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DataSourceStats {
    pub total_items: usize,
    pub from_db: usize,
    pub from_fallback: usize,
    pub db_ratio: f64,
}

impl DataSourceStats {
    pub fn from_blocks(blocks: &[ProcessBlock]) -> Self {
        let total_items: usize = blocks.iter().map(|b| b.materials.len() + 1).sum();
        let from_db: usize = blocks
            .iter()
            .map(|b| {
                b.materials.iter().filter(|m| m.origin == DataOrigin::Db).count()
                    + usize::from(b.labor.origin == DataOrigin::Db)
            })
            .sum();

        Self {
            total_items,
            from_db,
            from_fallback: total_items - from_db,
            db_ratio: if total_items > 0 {
                from_db as f64 / total_items as f64
            } else {
                0.0
            },
        }
    }
}

/// Timing of one pipeline stage, returned with the result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StageTrace {
    pub stage: String,
    pub duration_ms: u64,
    pub ok: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EstimateMeta {
    pub estimate_id: Uuid,
    pub version: String,
    pub grade: Grade,
    pub data_source_stats: DataSourceStats,
    pub calculated_at: DateTime<Utc>,
    #[serde(default)]
    pub stages: Vec<StageTrace>,
}

impl EstimateMeta {
    pub fn new(grade: Grade) -> Self {
        Self {
            estimate_id: Uuid::new_v4(),
            version: ESTIMATE_VERSION.to_string(),
            grade,
            data_source_stats: DataSourceStats::default(),
            calculated_at: Utc::now(),
            stages: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EstimateStatus {
    Success,
    Failed,
}

/// Final estimate. A success is never partial.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EstimateResult {
    pub status: EstimateStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<EstimateSummary>,
    #[serde(default)]
    pub breakdown: Vec<ProcessBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<EstimateFailure>,
    pub meta: EstimateMeta,
}

impl EstimateResult {
    pub fn success(summary: EstimateSummary, breakdown: Vec<ProcessBlock>, grade: Grade) -> Self {
        let mut meta = EstimateMeta::new(grade);
        meta.data_source_stats = DataSourceStats::from_blocks(&breakdown);
        Self {
            status: EstimateStatus::Success,
            summary: Some(summary),
            breakdown,
            failure: None,
            meta,
        }
    }

    pub fn failed(failure: EstimateFailure, grade: Grade) -> Self {
        Self {
            status: EstimateStatus::Failed,
            summary: None,
            breakdown: Vec::new(),
            failure: Some(failure),
            meta: EstimateMeta::new(grade),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == EstimateStatus::Success
    }
}
