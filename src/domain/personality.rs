use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::traits::TraitProfile;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LifestyleTag {
    RemoteWork,
    CookingFocused,
    SocialHost,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FamilyTag {
    HasInfant,
    HasChild,
    HasElderly,
    HasPet,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PersonalityTag {
    CleanOriented,
    StorageFocused,
    NoiseSensitive,
    LightFocused,
}

/// Who makes the renovation decisions
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DecisionMode {
    #[default]
    Solo,
    Joint,
    Split,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ClassifiedTypes {
    pub lifestyle: Vec<LifestyleTag>,
    pub family: Vec<FamilyTag>,
    pub personality: Vec<PersonalityTag>,
    pub decision: DecisionMode,
}

impl ClassifiedTypes {
    pub fn has_children(&self) -> bool {
        self.family
            .iter()
            .any(|t| matches!(t, FamilyTag::HasInfant | FamilyTag::HasChild))
    }

    pub fn tag_count(&self) -> usize {
        self.lifestyle.len() + self.family.len() + self.personality.len()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

pub const MAX_BUFFER_PERCENTAGE: f64 = 20.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub total_score: u32,
    pub level: RiskLevel,
    pub triggered_risks: Vec<String>,
    /// Contingency on top of the grand total, always within [0,20]
    pub buffer_percentage: f64,
}

/// Whether the customer's pain is about location or about the space itself
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProblemClassification {
    pub location_score: f64,
    pub space_score: f64,
    pub recommendation: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalityResult {
    pub trait_scores: TraitProfile,
    pub classified_types: ClassifiedTypes,
    pub risk_assessment: RiskAssessment,
    pub problem_classification: ProblemClassification,
    pub analyzed_at: DateTime<Utc>,
}
