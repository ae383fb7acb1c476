//! Itemized cost estimation.
//!
//! Optional strategy items never reach costing. Blocks are priced one at a
//! time and the first fatal error fails the whole estimate.

pub mod calculator;
pub mod summary;
pub mod tables;
pub mod validation;

use tracing::{error, info, instrument};

use crate::domain::{EstimateResult, EstimateSummary, ProcessBlock, Space, SpaceInfo, StrategyResult};
use crate::error::EstimateError;
use crate::services::pricing::{LaborRateLookup, MaterialPriceLookup};

pub use calculator::CostCalculator;
pub use summary::summarize;

pub const NO_SPACES_SELECTED: &str = "No spaces selected: choose at least one space to estimate";
pub const NO_PROCESSES_SELECTED: &str =
    "No processes selected: every suggested process is optional for the chosen spaces";

async fn price_blocks(
    calculator: &CostCalculator<'_>,
    strategy: &StrategyResult,
    space: &SpaceInfo,
    selection: &[Space],
    buffer_percentage: f64,
) -> Result<(EstimateSummary, Vec<ProcessBlock>), EstimateError> {
    let costed: Vec<_> = strategy
        .process_strategy
        .iter()
        .filter(|item| item.is_costed())
        .collect();

    if costed.is_empty() {
        let reason = if strategy.process_strategy.is_empty() {
            NO_SPACES_SELECTED
        } else {
            NO_PROCESSES_SELECTED
        };
        return Err(EstimateError::EmptyScope(reason.to_string()));
    }

    let mut blocks = Vec::with_capacity(costed.len());
    for item in costed {
        let block = calculator
            .calculate_block(item.process, strategy.recommended_grade, space, selection)
            .await?;
        blocks.push(block);
    }

    let summary = summarize(&blocks, buffer_percentage, space.floor_area);
    Ok((summary, blocks))
}

/// Price every costed strategy item. Never partial: any fatal error yields a
/// failed result carrying the offending process, reason and stage.
///
/// `selection` is the customer's scope and decides which spaces each block
/// is filed under.
#[instrument(skip_all, fields(grade = %strategy.recommended_grade, items = strategy.process_strategy.len()))]
pub async fn calculate(
    materials: &dyn MaterialPriceLookup,
    labor: &dyn LaborRateLookup,
    strategy: &StrategyResult,
    space: &SpaceInfo,
    selection: &[Space],
    buffer_percentage: f64,
) -> EstimateResult {
    let calculator = CostCalculator::new(materials, labor);
    let grade = strategy.recommended_grade;

    match price_blocks(&calculator, strategy, space, selection, buffer_percentage).await {
        Ok((summary, blocks)) => {
            info!(
                blocks = blocks.len(),
                grand_total = summary.grand_total,
                "Estimate calculated"
            );
            EstimateResult::success(summary, blocks, grade)
        }
        Err(e) => {
            error!(error = %e, stage = %e.stage(), "Estimate failed");
            EstimateResult::failed(e.into_failure(), grade)
        }
    }
}
