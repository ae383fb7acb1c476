use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::input::Space;

/// Material and finish quality tier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    Entry,
    Standard,
    Premium,
}

/// Pricing-catalog column holding the brand for a grade
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BrandColumn {
    BrandBasic,
    BrandArgen,
    BrandPremium,
}

impl BrandColumn {
    pub fn column_name(&self) -> &'static str {
        match self {
            Self::BrandBasic => "brand_basic",
            Self::BrandArgen => "brand_argen",
            Self::BrandPremium => "brand_premium",
        }
    }
}

impl Grade {
    pub const ALL: [Grade; 3] = [Self::Entry, Self::Standard, Self::Premium];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Entry => "entry",
            Self::Standard => "standard",
            Self::Premium => "premium",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Entry => "Essential",
            Self::Standard => "Standard",
            Self::Premium => "Opus",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Entry => "Sensible value for money",
            Self::Standard => "Balanced quality and price",
            Self::Premium => "Premium, tailored finishes",
        }
    }

    pub fn price_multiplier(&self) -> f64 {
        match self {
            Self::Entry => 0.85,
            Self::Standard => 1.0,
            Self::Premium => 1.25,
        }
    }

    pub fn brand_column(&self) -> BrandColumn {
        match self {
            Self::Entry => BrandColumn::BrandBasic,
            Self::Standard => BrandColumn::BrandArgen,
            Self::Premium => BrandColumn::BrandPremium,
        }
    }

    /// One tier up, saturating at the top
    pub fn escalate(&self) -> Self {
        match self {
            Self::Entry => Self::Standard,
            Self::Standard | Self::Premium => Self::Premium,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Grade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "entry" => Ok(Self::Entry),
            "standard" => Ok(Self::Standard),
            "premium" => Ok(Self::Premium),
            other => Err(format!("unknown grade: {other}")),
        }
    }
}

/// Closed set of independently priced renovation processes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ProcessId {
    KitchenCore,
    BathroomWaterproofing,
    StorageSystem,
    Soundproofing,
    Lighting,
    Flooring,
    Wallpaper,
    Window,
    Door,
    Demolition,
    ChildSafety,
}

impl ProcessId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::KitchenCore => "kitchen-core",
            Self::BathroomWaterproofing => "bathroom-waterproofing",
            Self::StorageSystem => "storage-system",
            Self::Soundproofing => "soundproofing",
            Self::Lighting => "lighting",
            Self::Flooring => "flooring",
            Self::Wallpaper => "wallpaper",
            Self::Window => "window",
            Self::Door => "door",
            Self::Demolition => "demolition",
            Self::ChildSafety => "child-safety",
        }
    }

    /// Whole-home work that applies to the `common` space
    pub fn is_whole_home(&self) -> bool {
        matches!(self, Self::Demolition)
    }

    /// Spaces where a trait-driven process takes effect
    pub fn target_spaces(&self) -> &'static [Space] {
        match self {
            Self::Soundproofing => &[Space::Living, Space::Bedroom],
            Self::StorageSystem => &[Space::Storage, Space::Entrance, Space::Bedroom],
            Self::ChildSafety => &[Space::Living, Space::Bedroom, Space::Kitchen],
            Self::KitchenCore => &[Space::Kitchen],
            Self::BathroomWaterproofing => &[Space::Bathroom],
            Self::Flooring | Self::Wallpaper | Self::Window => &[Space::Living, Space::Bedroom],
            Self::Lighting => &[Space::Living, Space::Bedroom, Space::Kitchen],
            Self::Door => &[Space::Living, Space::Bedroom, Space::Entrance],
            Self::Demolition => &[Space::Common],
        }
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProcessId {
    type Err = String;

    /// Accepts both the kebab-case ids and the snake_case ids legacy engines emit
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "kitchen-core" => Ok(Self::KitchenCore),
            "bathroom-waterproofing" | "bathroom-waterproof" => Ok(Self::BathroomWaterproofing),
            "storage-system" => Ok(Self::StorageSystem),
            "soundproofing" | "soundproof" => Ok(Self::Soundproofing),
            "lighting" => Ok(Self::Lighting),
            "flooring" => Ok(Self::Flooring),
            "wallpaper" => Ok(Self::Wallpaper),
            "window" => Ok(Self::Window),
            "door" => Ok(Self::Door),
            "demolition" => Ok(Self::Demolition),
            "child-safety" => Ok(Self::ChildSafety),
            other => Err(format!("unknown process: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Must,
    Recommended,
    /// Surfaced to the customer but never costed
    Optional,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProcessStrategyItem {
    #[serde(rename = "processId")]
    pub process: ProcessId,
    pub priority: Priority,
    pub reason: String,
    /// How well the process fits the customer's traits, within [0,1]
    pub personality_match: f64,
}

impl ProcessStrategyItem {
    pub fn is_costed(&self) -> bool {
        self.priority != Priority::Optional
    }
}

/// Even split of the maximum budget plus a flat contingency
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetStrategy {
    pub target_total: f64,
    pub buffer_amount: f64,
    pub priority_allocation: BTreeMap<ProcessId, f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyResult {
    pub recommended_grade: Grade,
    pub grade_reason: String,
    pub process_strategy: Vec<ProcessStrategyItem>,
    pub budget_strategy: BudgetStrategy,
}
