//! Fail-fast check of every cost line. One violation rejects the estimate.

use crate::domain::{FailureStage, LaborItem, MaterialItem, ProcessId};
use crate::error::EstimateError;

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

pub fn validate_material(process: ProcessId, item: &MaterialItem) -> Result<(), EstimateError> {
    if !positive(item.unit_price) {
        return Err(EstimateError::calculation(
            process,
            format!("material {} has unit price {}", item.material_id, item.unit_price),
            FailureStage::Validation,
        ));
    }
    if !positive(item.quantity) {
        return Err(EstimateError::calculation(
            process,
            format!("material {} has quantity {}", item.material_id, item.quantity),
            FailureStage::Validation,
        ));
    }
    Ok(())
}

pub fn validate_labor(process: ProcessId, item: &LaborItem) -> Result<(), EstimateError> {
    let violation = if !positive(item.daily_output) {
        Some(format!("labor daily output is {}", item.daily_output))
    } else if item.crew_size == 0 {
        Some("labor crew size is 0".to_string())
    } else if !positive(item.rate_per_person_day) {
        Some(format!("labor rate is {}", item.rate_per_person_day))
    } else {
        None
    };

    match violation {
        Some(reason) => Err(EstimateError::calculation(process, reason, FailureStage::Validation)),
        None => Ok(()),
    }
}

pub fn validate_block(
    process: ProcessId,
    materials: &[MaterialItem],
    labor: &LaborItem,
) -> Result<(), EstimateError> {
    for item in materials {
        validate_material(process, item)?;
    }
    validate_labor(process, labor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DataOrigin, PricingProcess};

    fn material(unit_price: f64, quantity: f64) -> MaterialItem {
        MaterialItem {
            material_id: "m-1".into(),
            name: "Flooring".into(),
            unit: "m2".into(),
            quantity,
            unit_price,
            total_price: unit_price * quantity,
            origin: DataOrigin::Db,
        }
    }

    fn labor(daily_output: f64, crew_size: u32, rate: f64) -> LaborItem {
        LaborItem {
            labor_type: PricingProcess::Finish,
            daily_output,
            crew_size,
            rate_per_person_day: rate,
            total_days: 3,
            total_cost: 0.0,
            origin: DataOrigin::Db,
        }
    }

    #[test]
    fn valid_block_passes() {
        assert!(validate_block(
            ProcessId::Flooring,
            &[material(52_000.0, 112.2)],
            &labor(40.0, 2, 250_000.0)
        )
        .is_ok());
    }

    #[test]
    fn zero_price_or_quantity_is_rejected() {
        for bad in [material(0.0, 10.0), material(10.0, 0.0), material(f64::NAN, 1.0)] {
            let err = validate_block(ProcessId::Flooring, &[bad], &labor(40.0, 2, 250_000.0))
                .unwrap_err();
            assert_eq!(err.stage(), FailureStage::Validation);
        }
    }

    #[test]
    fn broken_labor_is_rejected() {
        for bad in [labor(0.0, 2, 1.0), labor(1.0, 0, 1.0), labor(1.0, 2, -5.0)] {
            assert!(validate_labor(ProcessId::Flooring, &bad).is_err());
        }
    }
}
