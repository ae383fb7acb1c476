//! Per-process costing: material and labor resolution for one strategy item.

use tracing::{debug, error, instrument, warn};

use crate::domain::{
    FailureStage, Grade, LaborItem, MaterialItem, ProcessBlock, ProcessId, Space, SpaceInfo,
};
use crate::engine::estimate::{tables, validation};
use crate::error::EstimateError;
use crate::services::pricing::{
    LaborRateLookup, LaborRequest, MaterialCategory, MaterialPriceLookup, MaterialRequest,
    PricingError, QuantitySpec,
};

/// Difficulty multiplier applied to every labor line
pub const DEFAULT_DIFFICULTY: f64 = 1.0;

/// Spaces a block is shown under.
///
/// Whole-home work goes to `common`. Otherwise the selected spaces the
/// process targets. With no selection the process's default space is used;
/// costed work that targets none of the selected spaces is shared (`common`)
/// so it is never hidden from the customer.
pub fn block_spaces(process: ProcessId, selection: &[Space]) -> Vec<Space> {
    if process.is_whole_home() {
        return vec![Space::Common];
    }
    let default_space = tables::process_pricing(process).default_space;
    if selection.is_empty() {
        return vec![default_space];
    }

    let spaces: Vec<Space> = process
        .target_spaces()
        .iter()
        .copied()
        .filter(|s| selection.contains(s))
        .collect();
    if spaces.is_empty() {
        vec![Space::Common]
    } else {
        spaces
    }
}

pub struct CostCalculator<'a> {
    materials: &'a dyn MaterialPriceLookup,
    labor: &'a dyn LaborRateLookup,
}

impl<'a> CostCalculator<'a> {
    pub fn new(materials: &'a dyn MaterialPriceLookup, labor: &'a dyn LaborRateLookup) -> Self {
        Self { materials, labor }
    }

    /// Best effort, except a record with an unusable price which is fatal
    async fn resolve_materials(
        &self,
        process: ProcessId,
        grade: Grade,
        space: &SpaceInfo,
    ) -> Result<Vec<MaterialItem>, EstimateError> {
        let Some(spec) = tables::material_spec(process) else {
            warn!(process = %process, "No material mapping, costing labor only");
            return Ok(Vec::new());
        };
        let pricing = tables::process_pricing(process);

        let quantity = spec.rule.evaluate(space);
        let request = MaterialRequest {
            process: pricing.pricing,
            space: pricing.default_space,
            category: MaterialCategory {
                category1: spec.category1.to_string(),
                category2: spec.category2.to_string(),
                category3: spec.category3.map(str::to_string),
            },
            spec: spec.spec.to_string(),
            brand_column: grade.brand_column(),
            quantity: QuantitySpec {
                value: quantity,
                unit: spec.unit.to_string(),
                basis: spec.basis.to_string(),
            },
        };

        match self.materials.lookup_material(&request).await {
            Ok(quote) => Ok(vec![MaterialItem {
                material_id: quote.material_id,
                name: quote.product_name,
                unit: quote.unit,
                quantity,
                unit_price: quote.price,
                total_price: (quantity * quote.price).round(),
                origin: self.materials.origin(),
            }]),
            Err(PricingError::InvalidPrice(reason)) => {
                error!(process = %process, reason = %reason, "Material price rejected");
                Err(EstimateError::calculation(process, reason, FailureStage::Validation))
            }
            Err(e) => {
                warn!(process = %process, error = %e, "Material lookup failed, continuing without materials");
                Ok(Vec::new())
            }
        }
    }

    /// Exactly one labor line; any failure is fatal
    async fn resolve_labor(&self, process: ProcessId, space: &SpaceInfo) -> Result<LaborItem, EstimateError> {
        let pricing = tables::process_pricing(process).pricing;
        let spec = tables::labor_spec(pricing);
        let total_quantity = spec.rule.evaluate(space);

        let request = LaborRequest {
            process: pricing,
            unit: spec.unit,
            total_quantity,
            daily_output: spec.daily_output,
            crew_size: spec.crew_size,
            difficulty_factor: DEFAULT_DIFFICULTY,
        };

        let quote = self.labor.lookup_labor(&request).await.map_err(|e| {
            error!(process = %process, error = %e, "Labor lookup failed");
            EstimateError::calculation(process, e.to_string(), FailureStage::LaborLookup)
        })?;

        let total_days = if quote.daily_output > 0.0 {
            (total_quantity / quote.daily_output).ceil() as u32
        } else {
            0
        };
        let total_cost =
            f64::from(total_days) * f64::from(quote.crew_size) * quote.rate_per_person_day * DEFAULT_DIFFICULTY;

        Ok(LaborItem {
            labor_type: pricing,
            daily_output: quote.daily_output,
            crew_size: quote.crew_size,
            rate_per_person_day: quote.rate_per_person_day,
            total_days,
            total_cost,
            origin: self.labor.origin(),
        })
    }

    #[instrument(skip(self, space, selection), fields(grade = %grade))]
    pub async fn calculate_block(
        &self,
        process: ProcessId,
        grade: Grade,
        space: &SpaceInfo,
        selection: &[Space],
    ) -> Result<ProcessBlock, EstimateError> {
        let materials = self.resolve_materials(process, grade, space).await?;
        let labor = self.resolve_labor(process, space).await?;

        validation::validate_block(process, &materials, &labor)?;

        let material_subtotal: f64 = materials.iter().map(|m| m.total_price).sum();
        let labor_subtotal = labor.total_cost;
        let process_total = material_subtotal + labor_subtotal;

        debug!(process = %process, material_subtotal, labor_subtotal, "Process costed");

        Ok(ProcessBlock {
            process,
            process_name: labor.labor_type.display_name().to_string(),
            spaces: block_spaces(process, selection),
            materials,
            labor,
            material_subtotal,
            labor_subtotal,
            process_total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DataOrigin, HousingType, PricingProcess};
    use crate::services::InMemoryCatalog;

    fn home() -> SpaceInfo {
        SpaceInfo {
            housing_type: HousingType::Apartment,
            floor_area: 34.0,
            rooms: 3,
            bathrooms: 2,
            building_age: Some(12),
            floor: Some(9),
        }
    }

    #[test]
    fn whole_home_work_goes_to_common() {
        assert_eq!(block_spaces(ProcessId::Demolition, &[Space::Kitchen]), vec![Space::Common]);
    }

    #[test]
    fn block_spaces_follow_the_selection() {
        assert_eq!(block_spaces(ProcessId::Flooring, &[]), vec![Space::Living]);
        assert_eq!(
            block_spaces(ProcessId::Soundproofing, &[Space::Bedroom, Space::Kitchen]),
            vec![Space::Bedroom]
        );
        assert_eq!(block_spaces(ProcessId::Flooring, &[Space::Bedroom]), vec![Space::Bedroom]);
        assert_eq!(
            block_spaces(ProcessId::StorageSystem, &[Space::Kitchen, Space::Entrance]),
            vec![Space::Entrance]
        );
    }

    #[test]
    fn untargeted_work_is_shared_rather_than_hidden() {
        assert_eq!(block_spaces(ProcessId::KitchenCore, &[Space::Bathroom]), vec![Space::Common]);
    }

    #[tokio::test]
    async fn kitchen_block_has_material_and_labor() {
        let catalog = InMemoryCatalog::seeded();
        let calculator = CostCalculator::new(&catalog, &catalog);

        let block = calculator
            .calculate_block(ProcessId::KitchenCore, Grade::Standard, &home(), &[])
            .await
            .unwrap();

        assert_eq!(block.materials.len(), 1);
        assert_eq!(block.materials[0].unit_price, 6_500_000.0);
        assert_eq!(block.materials[0].origin, DataOrigin::Fallback);
        // ceil(1 / 0.5) days, crew of 2, 300,000 per person-day
        assert_eq!(block.labor.total_days, 2);
        assert_eq!(block.labor_subtotal, 1_200_000.0);
        assert_eq!(block.process_total, 7_700_000.0);
    }

    #[tokio::test]
    async fn labor_only_processes_still_cost_labor() {
        let catalog = InMemoryCatalog::seeded();
        let calculator = CostCalculator::new(&catalog, &catalog);

        let block = calculator
            .calculate_block(ProcessId::Soundproofing, Grade::Entry, &home(), &[Space::Living])
            .await
            .unwrap();

        assert!(block.materials.is_empty());
        assert_eq!(block.labor.labor_type, PricingProcess::Finish);
        // ceil(34 * 3.3 / 40) = 3 days
        assert_eq!(block.labor.total_days, 3);
        assert_eq!(block.labor_subtotal, 1_500_000.0);
    }

    #[tokio::test]
    async fn missing_material_is_best_effort() {
        let catalog = InMemoryCatalog::new().with_labor_rate(PricingProcess::Window, 280_000.0);
        let calculator = CostCalculator::new(&catalog, &catalog);

        let block = calculator
            .calculate_block(ProcessId::Window, Grade::Premium, &home(), &[])
            .await
            .unwrap();
        assert!(block.materials.is_empty());
        assert!(block.process_total > 0.0);
    }

    #[tokio::test]
    async fn missing_labor_rate_is_fatal() {
        let catalog = InMemoryCatalog::seeded().without_labor_rate(PricingProcess::Bathroom);
        let calculator = CostCalculator::new(&catalog, &catalog);

        let err = calculator
            .calculate_block(ProcessId::BathroomWaterproofing, Grade::Standard, &home(), &[])
            .await
            .unwrap_err();
        assert_eq!(err.stage(), FailureStage::LaborLookup);
    }
}
