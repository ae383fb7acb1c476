use crate::domain::{BudgetFlexibility, Grade, Preferences, Purpose, SpaceInfo, TraitCode, TraitProfile};

/// Budget per pyeong (KRW) below which the entry grade is chosen
pub const ENTRY_BUDGET_PER_AREA: f64 = 1_000_000.0;
/// Budget per pyeong (KRW) below which the standard grade is chosen
pub const STANDARD_BUDGET_PER_AREA: f64 = 1_500_000.0;
/// Cleaning and organization score that justifies one tier up
pub const ESCALATION_SCORE: u8 = 8;

pub fn grade_for_budget_per_area(per_area: f64) -> Grade {
    if per_area < ENTRY_BUDGET_PER_AREA {
        Grade::Entry
    } else if per_area < STANDARD_BUDGET_PER_AREA {
        Grade::Standard
    } else {
        Grade::Premium
    }
}

/// Pick a grade and explain why. A forced grade skips every heuristic.
pub fn select_grade(
    profile: &TraitProfile,
    space: &SpaceInfo,
    preferences: &Preferences,
    forced: Option<Grade>,
) -> (Grade, String) {
    if let Some(grade) = forced {
        return (
            grade,
            format!("{} grade requested explicitly; recommendation overridden", grade.display_name()),
        );
    }

    let per_area = preferences.budget.max / space.floor_area;
    let mut grade = grade_for_budget_per_area(per_area);
    let mut reason = format!("{} grade fits a budget of {:.0} KRW per pyeong", grade.display_name(), per_area);

    let tidy = profile.score(TraitCode::CleaningPreference) >= ESCALATION_SCORE
        && profile.score(TraitCode::OrganizationHabit) >= ESCALATION_SCORE;
    if tidy && preferences.budget.flexibility != BudgetFlexibility::Strict && grade != Grade::Premium {
        grade = grade.escalate();
        reason = format!(
            "Upgraded to {} for strong cleaning and organization preferences",
            grade.display_name()
        );
    }

    if preferences.purpose == Purpose::Sell && grade == Grade::Entry {
        grade = Grade::Standard;
        reason = format!("{} or better recommended when renovating to sell", grade.display_name());
    }

    (grade, reason)
}
