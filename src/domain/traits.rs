use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Closed vocabulary of customer traits
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TraitCode {
    StorageImportance,
    FlowImportance,
    LightImportance,
    NoiseSensitivity,
    CleaningPreference,
    StylePreference,
    ColorPreference,
    FamilyImpact,
    PetFriendly,
    BudgetFlexibility,
    ComplexityTolerance,
    ValueProtection,
    OrganizationHabit,
    CookingFrequency,
    GuestFrequency,
    WorkFromHome,
    ChildSafety,
    ElderlyCare,
}

impl TraitCode {
    pub const ALL: [TraitCode; 18] = [
        Self::StorageImportance,
        Self::FlowImportance,
        Self::LightImportance,
        Self::NoiseSensitivity,
        Self::CleaningPreference,
        Self::StylePreference,
        Self::ColorPreference,
        Self::FamilyImpact,
        Self::PetFriendly,
        Self::BudgetFlexibility,
        Self::ComplexityTolerance,
        Self::ValueProtection,
        Self::OrganizationHabit,
        Self::CookingFrequency,
        Self::GuestFrequency,
        Self::WorkFromHome,
        Self::ChildSafety,
        Self::ElderlyCare,
    ];
}

pub const MIN_TRAIT_SCORE: u8 = 1;
pub const MAX_TRAIT_SCORE: u8 = 10;
/// Score assumed for a trait nobody measured
pub const NEUTRAL_TRAIT_SCORE: u8 = 5;

/// Normalized 1-10 estimate along one trait
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TraitScore {
    #[serde(rename = "traitCode")]
    pub code: TraitCode,
    pub score: u8,
    pub confidence: f64,
}

impl TraitScore {
    /// Build a score, clamping into [1,10] and confidence into [0,1].
    pub fn new(code: TraitCode, score: i64, confidence: f64) -> Self {
        Self {
            code,
            score: score.clamp(MIN_TRAIT_SCORE as i64, MAX_TRAIT_SCORE as i64) as u8,
            confidence: if confidence.is_nan() {
                0.0
            } else {
                confidence.clamp(0.0, 1.0)
            },
        }
    }
}

/// Canonical enum-keyed score map for one request
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct TraitProfile {
    scores: BTreeMap<TraitCode, TraitScore>,
}

impl TraitProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, score: TraitScore) {
        self.scores.insert(score.code, score);
    }

    pub fn get(&self, code: TraitCode) -> Option<&TraitScore> {
        self.scores.get(&code)
    }

    /// Score for a trait, neutral when unknown
    pub fn score(&self, code: TraitCode) -> u8 {
        self.get(code).map(|s| s.score).unwrap_or(NEUTRAL_TRAIT_SCORE)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TraitScore> {
        self.scores.values()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Whether any score carries real signal (above fallback confidence)
    pub fn has_confident_scores(&self) -> bool {
        self.scores.values().any(|s| s.confidence > 0.5)
    }
}

impl FromIterator<TraitScore> for TraitProfile {
    fn from_iter<I: IntoIterator<Item = TraitScore>>(iter: I) -> Self {
        let mut profile = Self::new();
        for score in iter {
            profile.insert(score);
        }
        profile
    }
}
