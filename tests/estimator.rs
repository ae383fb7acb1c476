mod common;

use std::sync::atomic::Ordering;

use common::{input, ScriptedEngine};
use renovation_estimator::domain::legacy::LegacySeverity;
use renovation_estimator::domain::{
    BrandColumn, EstimateInput, FailureStage, Grade, Priority, ProcessId, RiskLevel, Space,
    TraitCode, NEUTRAL_TRAIT_SCORE,
};
use renovation_estimator::engine::personality::trait_scorer::FALLBACK_CONFIDENCE;
use renovation_estimator::engine::Estimator;
use renovation_estimator::services::pricing::MaterialQuote;
use renovation_estimator::services::InMemoryCatalog;

fn estimator() -> Estimator {
    Estimator::from_catalog(InMemoryCatalog::seeded())
}

fn priority_of(items: &[renovation_estimator::domain::ProcessStrategyItem], process: ProcessId) -> Option<Priority> {
    items.iter().find(|i| i.process == process).map(|i| i.priority)
}

#[tokio::test]
async fn kitchen_and_bathroom_without_traits_are_costed_at_standard() {
    let estimator = estimator();
    let request = input(34.0, 40_000_000.0, &[Space::Kitchen, Space::Bathroom]);

    let personality = estimator.analyze_personality(&request).await.unwrap();
    assert!(!personality.trait_scores.has_confident_scores());

    let strategy = estimator
        .determine_strategy(&request, &personality, None)
        .await
        .unwrap();
    assert_eq!(priority_of(&strategy.process_strategy, ProcessId::KitchenCore), Some(Priority::Must));
    assert_eq!(
        priority_of(&strategy.process_strategy, ProcessId::BathroomWaterproofing),
        Some(Priority::Must)
    );

    let result = estimator.calculate_estimate(&request).await.unwrap();
    assert!(result.is_success());
    assert_eq!(result.meta.grade, Grade::Standard);
    let summary = result.summary.unwrap();
    assert!(summary.grand_total > 0.0);
    assert_eq!(summary.grand_total, summary.material_total + summary.labor_total);
}

#[tokio::test]
async fn empty_selection_fails_instead_of_returning_an_empty_success() {
    let estimator = estimator();
    let request = input(34.0, 40_000_000.0, &[]);

    let result = estimator.calculate_estimate(&request).await.unwrap();
    assert!(!result.is_success());
    assert!(result.summary.is_none());
    let failure = result.failure.unwrap();
    assert_eq!(failure.stage, FailureStage::ScopeSelection);
    assert!(failure.reasons[0].contains("No spaces selected"));

    let ui = estimator.calculate_estimate_for_ui(&request, None).await;
    assert!(!ui.is_success);
    assert!(ui.breakdown.is_empty());
    assert!(ui.error_message.is_some());
}

#[tokio::test]
async fn one_zero_priced_material_fails_every_sibling() {
    let catalog = InMemoryCatalog::seeded().with_material(
        "wood_flooring",
        BrandColumn::BrandArgen,
        MaterialQuote {
            material_id: "wood_flooring-broken".into(),
            product_name: "Engineered oak".into(),
            unit: "m2".into(),
            price: 0.0,
        },
    );
    let estimator = Estimator::from_catalog(catalog);
    let request = input(34.0, 40_000_000.0, &[Space::Living, Space::Kitchen]);

    let result = estimator.calculate_estimate(&request).await.unwrap();
    assert!(!result.is_success());
    assert!(result.breakdown.is_empty());
    let failure = result.failure.unwrap();
    assert_eq!(failure.failed_processes, vec![ProcessId::Flooring]);
    assert_eq!(failure.stage, FailureStage::Validation);

    let ui = estimator.calculate_estimate_for_ui(&request, None).await;
    assert!(!ui.is_success);
    assert_eq!(ui.total.amount, 0.0);
}

#[tokio::test]
async fn noise_sensitivity_recommends_soundproofing_only_where_it_applies() {
    let engine = ScriptedEngine::default()
        .with_trait(TraitCode::NoiseSensitivity, 90.0)
        .shared();
    let estimator = estimator().with_legacy_engine(engine);

    let living = input(34.0, 40_000_000.0, &[Space::Living]);
    let personality = estimator.analyze_personality(&living).await.unwrap();
    assert_eq!(personality.trait_scores.score(TraitCode::NoiseSensitivity), 9);
    let strategy = estimator
        .determine_strategy(&living, &personality, None)
        .await
        .unwrap();
    assert_eq!(
        priority_of(&strategy.process_strategy, ProcessId::Soundproofing),
        Some(Priority::Recommended)
    );

    let kitchen = input(34.0, 40_000_000.0, &[Space::Kitchen]);
    let personality = estimator.analyze_personality(&kitchen).await.unwrap();
    let strategy = estimator
        .determine_strategy(&kitchen, &personality, None)
        .await
        .unwrap();
    assert_eq!(
        priority_of(&strategy.process_strategy, ProcessId::Soundproofing),
        Some(Priority::Optional)
    );

    let result = estimator.calculate_estimate(&kitchen).await.unwrap();
    assert!(result.is_success());
    assert!(result
        .breakdown
        .iter()
        .all(|b| b.process != ProcessId::Soundproofing));
}

#[tokio::test]
async fn forced_grade_overrides_a_tight_budget() {
    let estimator = estimator();
    let request = input(34.0, 10_000_000.0, &[Space::Kitchen]);

    let personality = estimator.analyze_personality(&request).await.unwrap();
    let natural = estimator
        .determine_strategy(&request, &personality, None)
        .await
        .unwrap();
    assert_eq!(natural.recommended_grade, Grade::Entry);

    let forced = estimator
        .determine_strategy(&request, &personality, Some(Grade::Premium))
        .await
        .unwrap();
    assert_eq!(forced.recommended_grade, Grade::Premium);
    assert!(forced.grade_reason.contains("overridden"));

    let ui = estimator
        .calculate_estimate_for_ui(&request, Some(Grade::Premium))
        .await;
    assert!(ui.is_success);
    assert_eq!(ui.grade, Grade::Premium);
}

#[tokio::test]
async fn refined_risk_drives_the_buffer() {
    let engine = ScriptedEngine::default()
        .with_risk("structural", LegacySeverity::High)
        .shared();
    let estimator = estimator().with_legacy_engine(engine.clone());
    let request = input(34.0, 40_000_000.0, &[Space::Kitchen]);

    let result = estimator.calculate_estimate(&request).await.unwrap();
    assert_eq!(engine.risk_calls.load(Ordering::SeqCst), 1);

    // 50 + 10 points is high risk, so 5 + 5 = 10%
    let summary = result.summary.unwrap();
    assert_eq!(summary.buffer_amount, (summary.grand_total * 0.10).round());
    let stages: Vec<_> = result.meta.stages.iter().map(|s| s.stage.as_str()).collect();
    assert_eq!(stages, vec!["personality", "strategy", "risk_refinement", "estimate"]);

    let ui = estimator.calculate_estimate_for_ui(&request, None).await;
    assert!(ui
        .warnings
        .iter()
        .any(|w| w.starts_with("High risk level")));
}

#[tokio::test]
async fn risk_refinement_failure_is_fatal() {
    let engine = ScriptedEngine {
        fail_risk: true,
        ..Default::default()
    }
    .shared();
    let estimator = estimator().with_legacy_engine(engine);
    let request = input(34.0, 40_000_000.0, &[Space::Kitchen]);

    let result = estimator.calculate_estimate(&request).await.unwrap();
    assert!(!result.is_success());
    assert_eq!(result.failure.unwrap().stage, FailureStage::RiskRefinement);
}

#[tokio::test]
async fn process_delegation_failure_is_fatal() {
    let engine = ScriptedEngine {
        fail_process: true,
        ..Default::default()
    }
    .shared();
    let estimator = estimator().with_legacy_engine(engine.clone());
    let request = input(34.0, 40_000_000.0, &[Space::Kitchen]);

    let result = estimator.calculate_estimate(&request).await.unwrap();
    assert_eq!(result.failure.unwrap().stage, FailureStage::ProcessDelegation);
    assert_eq!(engine.risk_calls.load(Ordering::SeqCst), 0);

    let ui = estimator.calculate_estimate_for_ui(&request, None).await;
    assert!(!ui.is_success);
}

#[tokio::test]
async fn preliminary_risk_stands_without_a_legacy_engine() {
    let estimator = estimator();
    let mut request = input(34.0, 40_000_000.0, &[Space::Kitchen]);
    request.space_info.building_age = Some(25);
    request.preferences.budget.flexibility = renovation_estimator::domain::BudgetFlexibility::Strict;

    let personality = estimator.analyze_personality(&request).await.unwrap();
    // 20 + 15 + 25
    assert_eq!(personality.risk_assessment.total_score, 60);
    assert_eq!(personality.risk_assessment.level, RiskLevel::High);
}

#[tokio::test]
async fn grade_comparison_prices_rise_with_grade() {
    let estimator = estimator();
    let request = input(34.0, 40_000_000.0, &[Space::Kitchen]);

    let comparison = estimator.compare_grades(&request).await;
    assert!(comparison.entry.is_success && comparison.standard.is_success && comparison.premium.is_success);
    assert_eq!(comparison.entry.grade, Grade::Entry);
    assert!(comparison.entry.total.amount < comparison.standard.total.amount);
    assert!(comparison.standard.total.amount < comparison.premium.total.amount);
}

#[tokio::test]
async fn seeded_catalog_lines_count_as_fallback() {
    let estimator = estimator();
    let request = input(34.0, 40_000_000.0, &[Space::Living]);

    let result = estimator.calculate_estimate(&request).await.unwrap();
    let stats = result.meta.data_source_stats;
    assert!(stats.total_items > 0);
    assert_eq!(stats.from_db, 0);
    assert_eq!(stats.from_fallback, stats.total_items);
}

/// Every costed block appears in the UI breakdown, so the rows add up to the
/// total the customer is shown
async fn assert_every_costed_block_is_shown(estimator: &Estimator, request: &EstimateInput) {
    let raw = estimator.calculate_estimate(request).await.unwrap();
    assert!(raw.is_success());

    let ui = estimator.calculate_estimate_for_ui(request, None).await;
    assert!(ui.is_success, "{:?}", ui.error_message);
    let shown: Vec<&str> = ui.breakdown.iter().map(|row| row.process_id.as_str()).collect();
    for block in &raw.breakdown {
        assert!(shown.contains(&block.process.as_str()), "{} hidden", block.process);
    }
    assert_eq!(ui.breakdown.len(), raw.breakdown.len());
}

#[tokio::test]
async fn bedroom_only_selection_shows_its_mandatory_work() {
    let estimator = estimator();
    let request = input(34.0, 40_000_000.0, &[Space::Bedroom]);

    let raw = estimator.calculate_estimate(&request).await.unwrap();
    assert!(!raw.breakdown.is_empty());
    assert!(raw.breakdown.iter().all(|b| b.spaces == vec![Space::Bedroom]));

    assert_every_costed_block_is_shown(&estimator, &request).await;
}

#[tokio::test]
async fn blocks_outside_the_process_selection_are_still_shown() {
    let estimator = estimator();
    let mut request = input(34.0, 40_000_000.0, &[Space::Kitchen, Space::Entrance]);
    request
        .selected_processes
        .insert(Space::Kitchen, vec!["sink".to_string()]);

    let raw = estimator.calculate_estimate(&request).await.unwrap();
    let storage = raw
        .breakdown
        .iter()
        .find(|b| b.process == ProcessId::StorageSystem)
        .unwrap();
    assert_eq!(storage.spaces, vec![Space::Entrance]);

    assert_every_costed_block_is_shown(&estimator, &request).await;
}

#[tokio::test]
async fn failed_trait_scoring_falls_back_to_neutral_traits() {
    let engine = ScriptedEngine {
        fail_traits: true,
        ..Default::default()
    }
    .shared();
    let estimator = estimator().with_legacy_engine(engine);
    let request = input(34.0, 40_000_000.0, &[Space::Kitchen]);

    let personality = estimator.analyze_personality(&request).await.unwrap();
    assert_eq!(personality.trait_scores.len(), TraitCode::ALL.len());
    assert!(personality
        .trait_scores
        .iter()
        .all(|s| s.score == NEUTRAL_TRAIT_SCORE && s.confidence == FALLBACK_CONFIDENCE));

    let result = estimator.calculate_estimate(&request).await.unwrap();
    assert!(result.is_success());
}

#[tokio::test]
async fn unknown_indicators_fall_back_to_neutral_traits() {
    let engine = ScriptedEngine::default()
        .with_unknown_indicator("moon_phase_affinity", 90.0)
        .shared();
    let estimator = estimator().with_legacy_engine(engine);
    let request = input(34.0, 40_000_000.0, &[Space::Kitchen]);

    let personality = estimator.analyze_personality(&request).await.unwrap();
    assert_eq!(personality.trait_scores.len(), TraitCode::ALL.len());
    assert!(!personality.trait_scores.has_confident_scores());
    assert!(personality
        .trait_scores
        .iter()
        .all(|s| s.confidence == FALLBACK_CONFIDENCE));
}
