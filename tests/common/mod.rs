#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use renovation_estimator::domain::legacy::{
    LegacyProcessRequest, LegacyProcessResult, LegacyRisk, LegacyRiskRequest, LegacyRiskResult,
    LegacySeverity, LegacyTraitRequest, LegacyTraitResult,
};
use renovation_estimator::domain::{
    Budget, BudgetFlexibility, EstimateInput, Family, HousingType, Lifestyle, Preferences,
    Purpose, Space, SpaceInfo, TraitCode,
};
use renovation_estimator::engine::bridge;
use renovation_estimator::services::{LegacyEngine, LegacyEngineError};

pub fn input(floor_area: f64, budget_max: f64, selected_spaces: &[Space]) -> EstimateInput {
    EstimateInput {
        space_info: SpaceInfo {
            housing_type: HousingType::Apartment,
            floor_area,
            rooms: 3,
            bathrooms: 2,
            building_age: Some(12),
            floor: Some(8),
        },
        preferences: Preferences {
            budget: Budget {
                min: budget_max * 0.8,
                max: budget_max,
                flexibility: BudgetFlexibility::Flexible,
            },
            family: Family {
                total_people: 1,
                has_infant: false,
                has_child: false,
                has_elderly: false,
                has_pet: false,
            },
            lifestyle: Lifestyle::default(),
            purpose: Purpose::Live,
        },
        selected_spaces: selected_spaces.to_vec(),
        selected_processes: BTreeMap::new(),
        answers: vec![],
        timestamp: Utc::now(),
    }
}

/// Legacy engine returning fixed indicators and risks
#[derive(Default)]
pub struct ScriptedEngine {
    pub indicators: BTreeMap<String, f64>,
    pub risks: Vec<LegacyRisk>,
    pub fail_traits: bool,
    pub fail_process: bool,
    pub fail_risk: bool,
    pub risk_calls: AtomicUsize,
}

impl ScriptedEngine {
    pub fn with_trait(mut self, code: TraitCode, legacy_score: f64) -> Self {
        self.indicators
            .insert(bridge::legacy_label(code).to_string(), legacy_score);
        self
    }

    /// Indicator under a label the bridge does not know
    pub fn with_unknown_indicator(mut self, label: &str, legacy_score: f64) -> Self {
        self.indicators.insert(label.to_string(), legacy_score);
        self
    }

    pub fn with_risk(mut self, id: &str, level: LegacySeverity) -> Self {
        self.risks.push(LegacyRisk {
            id: id.to_string(),
            level,
        });
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl LegacyEngine for ScriptedEngine {
    async fn analyze_traits(
        &self,
        _request: &LegacyTraitRequest,
    ) -> Result<LegacyTraitResult, LegacyEngineError> {
        if self.fail_traits {
            return Err(LegacyEngineError::Timeout(Duration::from_secs(10)));
        }
        Ok(LegacyTraitResult {
            indicators: self.indicators.clone(),
            priority_areas: vec![],
        })
    }

    async fn analyze_process(
        &self,
        _request: &LegacyProcessRequest,
    ) -> Result<LegacyProcessResult, LegacyEngineError> {
        if self.fail_process {
            return Err(LegacyEngineError::Transport("connection refused".into()));
        }
        Ok(LegacyProcessResult::default())
    }

    async fn analyze_risk(
        &self,
        _request: &LegacyRiskRequest,
    ) -> Result<LegacyRiskResult, LegacyEngineError> {
        self.risk_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_risk {
            return Err(LegacyEngineError::Status {
                status: 503,
                message: "risk model offline".into(),
            });
        }
        Ok(LegacyRiskResult {
            risks: self.risks.clone(),
        })
    }
}
