use crate::domain::{EstimateSummary, ProcessBlock};

pub const VAT_RATE: f64 = 0.1;

/// Totals across blocks; VAT and buffer are rounded to whole won
pub fn summarize(blocks: &[ProcessBlock], buffer_percentage: f64, floor_area: f64) -> EstimateSummary {
    let material_total: f64 = blocks.iter().map(|b| b.material_subtotal).sum();
    let labor_total: f64 = blocks.iter().map(|b| b.labor_subtotal).sum();
    let grand_total = material_total + labor_total;
    let vat_amount = (grand_total * VAT_RATE).round();
    let buffer_amount = (grand_total * buffer_percentage / 100.0).round();
    let total_with_buffer = grand_total + vat_amount + buffer_amount;
    let cost_per_area = if floor_area > 0.0 {
        (total_with_buffer / floor_area).round()
    } else {
        0.0
    };

    EstimateSummary {
        material_total,
        labor_total,
        grand_total,
        vat_amount,
        buffer_amount,
        total_with_buffer,
        cost_per_area,
    }
}
