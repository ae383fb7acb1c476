use tracing::warn;

use crate::domain::{
    PersonalityResult, Priority, ProcessId, ProcessStrategyItem, Space, TraitCode, TraitProfile,
};

/// Trait score that makes a trait-driven process worth suggesting
pub const TRAIT_PROCESS_THRESHOLD: u8 = 7;
pub const CHILD_SAFETY_MATCH: f64 = 0.8;
pub const DEFAULT_PERSONALITY_MATCH: f64 = 0.5;

/// Processes every selected space needs
pub fn mandatory_processes(space: Space) -> &'static [ProcessId] {
    match space {
        Space::Kitchen => &[ProcessId::KitchenCore],
        Space::Bathroom => &[ProcessId::BathroomWaterproofing],
        Space::Living => &[ProcessId::Flooring, ProcessId::Wallpaper, ProcessId::Lighting],
        Space::Bedroom => &[ProcessId::Flooring, ProcessId::Wallpaper],
        Space::Entrance | Space::Storage => &[ProcessId::StorageSystem],
        Space::Common => &[],
    }
}

pub fn related_traits(process: ProcessId) -> &'static [TraitCode] {
    match process {
        ProcessId::KitchenCore => &[TraitCode::CookingFrequency],
        ProcessId::BathroomWaterproofing => &[TraitCode::CleaningPreference],
        ProcessId::StorageSystem => &[TraitCode::StorageImportance, TraitCode::OrganizationHabit],
        ProcessId::Soundproofing => &[TraitCode::NoiseSensitivity],
        ProcessId::Lighting | ProcessId::Wallpaper => &[TraitCode::LightImportance],
        ProcessId::Flooring => &[TraitCode::CleaningPreference, TraitCode::ChildSafety],
        ProcessId::Window => &[TraitCode::NoiseSensitivity, TraitCode::LightImportance],
        ProcessId::Door | ProcessId::Demolition | ProcessId::ChildSafety => &[],
    }
}

/// Mean of the related trait scores over 10, or 0.5 without any signal
pub fn personality_match(process: ProcessId, profile: &TraitProfile) -> f64 {
    let scores: Vec<f64> = related_traits(process)
        .iter()
        .filter_map(|code| profile.get(*code))
        .map(|s| f64::from(s.score))
        .collect();

    if scores.is_empty() {
        return DEFAULT_PERSONALITY_MATCH;
    }
    scores.iter().sum::<f64>() / scores.len() as f64 / 10.0
}

fn push_unique(items: &mut Vec<ProcessStrategyItem>, item: ProcessStrategyItem) {
    if !items.iter().any(|existing| existing.process == item.process) {
        items.push(item);
    }
}

/// Trait-driven suggestion, downgraded when none of its spaces were selected
fn suggest(
    process: ProcessId,
    selected: &[Space],
    personality_match: f64,
    reason: &str,
) -> Option<ProcessStrategyItem> {
    let applies = process.target_spaces().iter().any(|s| selected.contains(s));
    let priority = if applies {
        Priority::Recommended
    } else if !selected.is_empty() {
        Priority::Optional
    } else {
        return None;
    };

    let reason = match priority {
        Priority::Optional => format!("{reason}; its spaces were not selected, so it stays optional"),
        _ => reason.to_string(),
    };
    Some(ProcessStrategyItem {
        process,
        priority,
        reason,
        personality_match,
    })
}

pub fn trait_driven_processes(
    personality: &PersonalityResult,
    selected: &[Space],
) -> Vec<ProcessStrategyItem> {
    let profile = &personality.trait_scores;
    let mut items = Vec::new();

    let noise = profile.score(TraitCode::NoiseSensitivity);
    if noise >= TRAIT_PROCESS_THRESHOLD {
        items.extend(suggest(
            ProcessId::Soundproofing,
            selected,
            f64::from(noise) / 10.0,
            "High noise sensitivity calls for soundproofing",
        ));
    }

    let storage = profile.score(TraitCode::StorageImportance);
    if storage >= TRAIT_PROCESS_THRESHOLD {
        items.extend(suggest(
            ProcessId::StorageSystem,
            selected,
            f64::from(storage) / 10.0,
            "Storage matters a lot, so custom storage is suggested",
        ));
    }

    if personality.classified_types.has_children() {
        items.extend(suggest(
            ProcessId::ChildSafety,
            selected,
            CHILD_SAFETY_MATCH,
            "Children in the home call for safety work",
        ));
    }

    items
}

/// Mandatory layer for the selected spaces, then trait-driven suggestions.
/// An empty selection yields no mandatory items.
pub fn pick_processes(personality: &PersonalityResult, selected: &[Space]) -> Vec<ProcessStrategyItem> {
    let profile = &personality.trait_scores;
    let mut items = Vec::new();

    for space in selected {
        for process in mandatory_processes(*space) {
            push_unique(
                &mut items,
                ProcessStrategyItem {
                    process: *process,
                    priority: Priority::Must,
                    reason: format!("Required for the selected {} space", space.as_str()),
                    personality_match: personality_match(*process, profile),
                },
            );
        }
    }

    for item in trait_driven_processes(personality, selected) {
        push_unique(&mut items, item);
    }

    if items.is_empty() {
        warn!(selected_spaces = selected.len(), "No processes picked for the selection");
    }
    items
}

/// Append legacy recommendations without overwriting existing items
pub fn merge_recommendations(
    mut items: Vec<ProcessStrategyItem>,
    recommendations: Vec<ProcessStrategyItem>,
) -> Vec<ProcessStrategyItem> {
    for item in recommendations {
        push_unique(&mut items, item);
    }
    items
}
