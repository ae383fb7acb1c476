//! End-to-end orchestration of the estimate pipeline.
//!
//! Stages run strictly in order: personality, strategy, optional risk
//! refinement, costing. The first fatal error ends the run.

use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument, warn};

use crate::domain::{
    AnswerValue, EstimateInput, EstimateResult, Grade, GradeComparison, PersonalityResult,
    StageTrace, StrategyResult, UiEstimate,
};
use crate::engine::{estimate, personality, strategy, ui_adapter};
use crate::error::EstimateError;
use crate::services::{LaborRateLookup, LegacyEngine, MaterialPriceLookup};

/// Reject malformed input before any stage runs
pub fn validate_input(input: &EstimateInput) -> Result<(), EstimateError> {
    let space = &input.space_info;
    if !space.floor_area.is_finite() || space.floor_area <= 0.0 {
        return Err(EstimateError::invalid_input(format!(
            "floor area must be positive, got {}",
            space.floor_area
        )));
    }

    let budget = &input.preferences.budget;
    if !budget.min.is_finite() || !budget.max.is_finite() {
        return Err(EstimateError::invalid_input("budget must be a finite amount"));
    }
    if budget.min < 0.0 || budget.max < 0.0 {
        return Err(EstimateError::invalid_input("budget cannot be negative"));
    }
    if budget.min > budget.max {
        return Err(EstimateError::invalid_input(format!(
            "budget minimum {} exceeds maximum {}",
            budget.min, budget.max
        )));
    }

    if input.preferences.family.total_people == 0 {
        return Err(EstimateError::invalid_input("family must include at least one person"));
    }

    if let Some(answer) = input
        .answers
        .iter()
        .find(|a| matches!(a.value, Some(AnswerValue::Number(n)) if !n.is_finite()))
    {
        return Err(EstimateError::invalid_input(format!(
            "answer to {} is not a number",
            answer.question_id
        )));
    }

    Ok(())
}

/// Collects per-stage timings for `meta.stages`
#[derive(Default)]
struct StageRecorder {
    stages: Vec<StageTrace>,
}

impl StageRecorder {
    fn record(&mut self, stage: &str, started: Instant, ok: bool) {
        self.stages.push(StageTrace {
            stage: stage.to_string(),
            duration_ms: started.elapsed().as_millis() as u64,
            ok,
        });
    }
}

/// Everything one run produced. `strategy` is absent when the run failed
/// before a strategy existed.
struct PipelineRun {
    personality: PersonalityResult,
    strategy: Option<StrategyResult>,
    estimate: EstimateResult,
}

/// Pipeline entry point, wired once at start-up and shared across requests.
#[derive(Clone)]
pub struct Estimator {
    materials: Arc<dyn MaterialPriceLookup>,
    labor: Arc<dyn LaborRateLookup>,
    legacy_engine: Option<Arc<dyn LegacyEngine>>,
}

impl Estimator {
    pub fn new(materials: Arc<dyn MaterialPriceLookup>, labor: Arc<dyn LaborRateLookup>) -> Self {
        Self {
            materials,
            labor,
            legacy_engine: None,
        }
    }

    /// One catalog serving both material and labor lookups
    pub fn from_catalog<C>(catalog: C) -> Self
    where
        C: MaterialPriceLookup + LaborRateLookup + 'static,
    {
        let catalog = Arc::new(catalog);
        Self::new(catalog.clone(), catalog)
    }

    pub fn with_legacy_engine(mut self, engine: Arc<dyn LegacyEngine>) -> Self {
        self.legacy_engine = Some(engine);
        self
    }

    pub fn legacy_engine(&self) -> Option<&Arc<dyn LegacyEngine>> {
        self.legacy_engine.as_ref()
    }

    fn legacy(&self) -> Option<&dyn LegacyEngine> {
        self.legacy_engine.as_deref()
    }

    pub async fn analyze_personality(
        &self,
        input: &EstimateInput,
    ) -> Result<PersonalityResult, EstimateError> {
        validate_input(input)?;
        Ok(personality::analyze(
            self.legacy(),
            &input.answers,
            &input.space_info,
            &input.preferences,
        )
        .await)
    }

    pub async fn determine_strategy(
        &self,
        input: &EstimateInput,
        personality: &PersonalityResult,
        forced_grade: Option<Grade>,
    ) -> Result<StrategyResult, EstimateError> {
        strategy::determine_strategy(
            personality,
            &input.space_info,
            &input.preferences,
            &input.selected_spaces,
            self.legacy(),
            forced_grade,
        )
        .await
    }

    /// Strategy, refinement and costing for an already analyzed customer
    async fn run_with_personality(
        &self,
        input: &EstimateInput,
        mut personality: PersonalityResult,
        forced_grade: Option<Grade>,
        mut recorder: StageRecorder,
    ) -> PipelineRun {
        let started = Instant::now();
        let strategy = match self.determine_strategy(input, &personality, forced_grade).await {
            Ok(strategy) => {
                recorder.record("strategy", started, true);
                strategy
            }
            Err(e) => {
                recorder.record("strategy", started, false);
                let (grade, _) = strategy::select_grade(
                    &personality.trait_scores,
                    &input.space_info,
                    &input.preferences,
                    forced_grade,
                );
                let mut estimate = EstimateResult::failed(e.into_failure(), grade);
                estimate.meta.stages = recorder.stages;
                return PipelineRun {
                    personality,
                    strategy: None,
                    estimate,
                };
            }
        };

        if let Some(engine) = self.legacy() {
            let started = Instant::now();
            let refined = personality::refine_risk_with_strategy(
                engine,
                &personality.trait_scores,
                &personality.classified_types,
                &strategy,
                &input.preferences,
                &input.space_info,
            )
            .await;
            match refined {
                Ok(risk) => {
                    recorder.record("risk_refinement", started, true);
                    personality.risk_assessment = risk;
                }
                Err(e) => {
                    recorder.record("risk_refinement", started, false);
                    let mut estimate = EstimateResult::failed(e.into_failure(), strategy.recommended_grade);
                    estimate.meta.stages = recorder.stages;
                    return PipelineRun {
                        personality,
                        strategy: Some(strategy),
                        estimate,
                    };
                }
            }
        }

        let started = Instant::now();
        let mut estimate = estimate::calculate(
            self.materials.as_ref(),
            self.labor.as_ref(),
            &strategy,
            &input.space_info,
            &input.scope_spaces(),
            personality.risk_assessment.buffer_percentage,
        )
        .await;
        recorder.record("estimate", started, estimate.is_success());
        estimate.meta.stages = recorder.stages;

        PipelineRun {
            personality,
            strategy: Some(strategy),
            estimate,
        }
    }

    async fn run(&self, input: &EstimateInput, forced_grade: Option<Grade>) -> Result<PipelineRun, EstimateError> {
        let mut recorder = StageRecorder::default();
        let started = Instant::now();
        let personality = self.analyze_personality(input).await?;
        recorder.record("personality", started, true);

        Ok(self
            .run_with_personality(input, personality, forced_grade, recorder)
            .await)
    }

    /// Raw estimate. Only malformed input is an `Err`; every later failure
    /// is carried inside a failed `EstimateResult`.
    #[instrument(skip_all, fields(floor_area = input.space_info.floor_area, spaces = input.selected_spaces.len()))]
    pub async fn calculate_estimate(&self, input: &EstimateInput) -> Result<EstimateResult, EstimateError> {
        let run = self.run(input, None).await?;
        info!(
            estimate_id = %run.estimate.meta.estimate_id,
            success = run.estimate.is_success(),
            grade = %run.estimate.meta.grade,
            "Estimate request complete"
        );
        Ok(run.estimate)
    }

    fn project(run: &PipelineRun, input: &EstimateInput) -> UiEstimate {
        match &run.strategy {
            Some(strategy) => ui_adapter::adapt(&run.estimate, &run.personality, strategy, &input.scope_spaces()),
            None => {
                let message = run
                    .estimate
                    .failure
                    .as_ref()
                    .and_then(|f| f.reasons.first().cloned())
                    .unwrap_or_else(|| ui_adapter::GENERIC_FAILURE_MESSAGE.to_string());
                ui_adapter::failed(run.estimate.meta.grade, message, Some(&run.personality))
            }
        }
    }

    /// Presentation estimate. Never fails: errors become a failed `UiEstimate`.
    #[instrument(skip_all, fields(forced = ?forced_grade))]
    pub async fn calculate_estimate_for_ui(&self, input: &EstimateInput, forced_grade: Option<Grade>) -> UiEstimate {
        match self.run(input, forced_grade).await {
            Ok(run) => Self::project(&run, input),
            Err(e) => {
                warn!(error = %e, "Rejected estimate input");
                ui_adapter::failed(forced_grade.unwrap_or(Grade::Standard), e.to_string(), None)
            }
        }
    }

    /// What-if estimates for each grade from a single personality analysis
    #[instrument(skip_all)]
    pub async fn compare_grades(&self, input: &EstimateInput) -> GradeComparison {
        let personality = match self.analyze_personality(input).await {
            Ok(personality) => personality,
            Err(e) => {
                warn!(error = %e, "Rejected estimate input");
                let message = e.to_string();
                return GradeComparison {
                    entry: ui_adapter::failed(Grade::Entry, message.clone(), None),
                    standard: ui_adapter::failed(Grade::Standard, message.clone(), None),
                    premium: ui_adapter::failed(Grade::Premium, message, None),
                };
            }
        };

        GradeComparison {
            entry: self.project_grade(input, &personality, Grade::Entry).await,
            standard: self.project_grade(input, &personality, Grade::Standard).await,
            premium: self.project_grade(input, &personality, Grade::Premium).await,
        }
    }

    async fn project_grade(&self, input: &EstimateInput, personality: &PersonalityResult, grade: Grade) -> UiEstimate {
        let run = self
            .run_with_personality(input, personality.clone(), Some(grade), StageRecorder::default())
            .await;
        Self::project(&run, input)
    }
}
