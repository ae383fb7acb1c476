use crate::domain::{
    ClassifiedTypes, DecisionMode, FamilyTag, LifestyleTag, PersonalityTag, Preferences,
    TraitCode, TraitProfile,
};

/// Score at which a trait turns into a personality tag
pub const TAG_THRESHOLD: u8 = 7;

/// Household size from which decisions are made jointly
pub const JOINT_DECISION_FAMILY_SIZE: u32 = 2;

/// Derive lifestyle, family and personality tags. Pure.
pub fn classify(profile: &TraitProfile, preferences: &Preferences) -> ClassifiedTypes {
    let lifestyle_flags = &preferences.lifestyle;
    let lifestyle = [
        (lifestyle_flags.remote_work, LifestyleTag::RemoteWork),
        (lifestyle_flags.cook_often, LifestyleTag::CookingFocused),
        (lifestyle_flags.guests_often, LifestyleTag::SocialHost),
    ]
    .into_iter()
    .filter_map(|(set, tag)| set.then_some(tag))
    .collect();

    let family_flags = &preferences.family;
    let family = [
        (family_flags.has_infant, FamilyTag::HasInfant),
        (family_flags.has_child, FamilyTag::HasChild),
        (family_flags.has_elderly, FamilyTag::HasElderly),
        (family_flags.has_pet, FamilyTag::HasPet),
    ]
    .into_iter()
    .filter_map(|(set, tag)| set.then_some(tag))
    .collect();

    let high = |code: TraitCode| profile.score(code) >= TAG_THRESHOLD;
    let organized = high(TraitCode::OrganizationHabit);

    let mut personality = Vec::new();
    if organized && high(TraitCode::CleaningPreference) {
        personality.push(PersonalityTag::CleanOriented);
    }
    if organized && high(TraitCode::StorageImportance) {
        personality.push(PersonalityTag::StorageFocused);
    }
    if high(TraitCode::NoiseSensitivity) {
        personality.push(PersonalityTag::NoiseSensitive);
    }
    if high(TraitCode::LightImportance) {
        personality.push(PersonalityTag::LightFocused);
    }

    let decision = if family_flags.total_people >= JOINT_DECISION_FAMILY_SIZE {
        DecisionMode::Joint
    } else {
        DecisionMode::Solo
    };

    ClassifiedTypes {
        lifestyle,
        family,
        personality,
        decision,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Budget, BudgetFlexibility, Family, Lifestyle, Purpose, TraitScore,
    };

    fn preferences(total_people: u32) -> Preferences {
        Preferences {
            budget: Budget {
                min: 20_000_000.0,
                max: 40_000_000.0,
                flexibility: BudgetFlexibility::Flexible,
            },
            family: Family {
                total_people,
                has_infant: false,
                has_child: true,
                has_elderly: false,
                has_pet: true,
            },
            lifestyle: Lifestyle {
                remote_work: true,
                cook_often: false,
                guests_often: false,
            },
            purpose: Purpose::Live,
        }
    }

    #[test]
    fn tags_follow_flags() {
        let types = classify(&TraitProfile::new(), &preferences(1));
        assert_eq!(types.lifestyle, vec![LifestyleTag::RemoteWork]);
        assert_eq!(types.family, vec![FamilyTag::HasChild, FamilyTag::HasPet]);
        assert!(types.personality.is_empty());
        assert_eq!(types.decision, DecisionMode::Solo);
    }

    #[test]
    fn personality_tags_need_both_traits() {
        let profile: TraitProfile = [
            TraitScore::new(TraitCode::OrganizationHabit, 8, 0.7),
            TraitScore::new(TraitCode::CleaningPreference, 7, 0.7),
            TraitScore::new(TraitCode::StorageImportance, 6, 0.7),
            TraitScore::new(TraitCode::NoiseSensitivity, 9, 0.7),
        ]
        .into_iter()
        .collect();

        let types = classify(&profile, &preferences(3));
        assert_eq!(
            types.personality,
            vec![PersonalityTag::CleanOriented, PersonalityTag::NoiseSensitive]
        );
        assert_eq!(types.decision, DecisionMode::Joint);
    }
}
