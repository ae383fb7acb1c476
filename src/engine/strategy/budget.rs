use std::collections::BTreeMap;

use crate::domain::{Budget, BudgetStrategy, ProcessStrategyItem};

/// Flat contingency share of the maximum budget
pub const CONTINGENCY_RATE: f64 = 0.1;

/// Even split of the maximum budget across strategy items
pub fn plan_budget(budget: &Budget, items: &[ProcessStrategyItem]) -> BudgetStrategy {
    let target_total = budget.max;
    let share = if items.is_empty() {
        0.0
    } else {
        target_total / items.len() as f64
    };

    let priority_allocation: BTreeMap<_, _> = items.iter().map(|i| (i.process, share)).collect();

    BudgetStrategy {
        target_total,
        buffer_amount: (target_total * CONTINGENCY_RATE).round(),
        priority_allocation,
    }
}
