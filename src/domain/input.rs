use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Housing type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HousingType {
    Apartment,
    Villa,
    House,
    Officetel,
}

/// A physical home area that can be included in the renovation scope.
///
/// `Common` is the universal bucket for whole-home work (demolition,
/// protection) and is never selected by the customer directly.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Space {
    Kitchen,
    Bathroom,
    Living,
    Bedroom,
    Entrance,
    Storage,
    Common,
}

impl Space {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kitchen => "kitchen",
            Self::Bathroom => "bathroom",
            Self::Living => "living",
            Self::Bedroom => "bedroom",
            Self::Entrance => "entrance",
            Self::Storage => "storage",
            Self::Common => "common",
        }
    }
}

/// Customer-entered home information
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceInfo {
    pub housing_type: HousingType,
    /// Exclusive floor area in pyeong (≈3.3 m²)
    pub floor_area: f64,
    pub rooms: u32,
    pub bathrooms: u32,
    #[serde(default)]
    pub building_age: Option<u32>,
    #[serde(default)]
    pub floor: Option<i32>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BudgetFlexibility {
    Strict,
    Flexible,
    Uncertain,
}

impl BudgetFlexibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Flexible => "flexible",
            Self::Uncertain => "uncertain",
        }
    }
}

/// Budget range in KRW
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub min: f64,
    pub max: f64,
    pub flexibility: BudgetFlexibility,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Family {
    pub total_people: u32,
    #[serde(default)]
    pub has_infant: bool,
    #[serde(default)]
    pub has_child: bool,
    #[serde(default)]
    pub has_elderly: bool,
    #[serde(default)]
    pub has_pet: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lifestyle {
    #[serde(default)]
    pub remote_work: bool,
    #[serde(default)]
    pub cook_often: bool,
    #[serde(default)]
    pub guests_often: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Purpose {
    Live,
    Sell,
    Rent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preferences {
    pub budget: Budget,
    pub family: Family,
    #[serde(default)]
    pub lifestyle: Lifestyle,
    pub purpose: Purpose,
}

/// Answer value as submitted by the questionnaire
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AnswerValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

/// A single questionnaire answer. Order is irrelevant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAnswer {
    pub question_id: String,
    pub answer_id: String,
    #[serde(default)]
    pub value: Option<AnswerValue>,
}

/// Everything collected from the customer for one estimate request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateInput {
    pub space_info: SpaceInfo,
    pub preferences: Preferences,
    #[serde(default)]
    pub selected_spaces: Vec<Space>,
    /// Selected process option ids per space
    #[serde(default)]
    pub selected_processes: BTreeMap<Space, Vec<String>>,
    #[serde(default)]
    pub answers: Vec<UserAnswer>,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl EstimateInput {
    /// Every space in scope: the selected spaces plus any space the
    /// customer picked processes for, in selection order
    pub fn scope_spaces(&self) -> Vec<Space> {
        let mut spaces = self.selected_spaces.clone();
        for space in self.selected_processes.keys() {
            if !spaces.contains(space) {
                spaces.push(*space);
            }
        }
        spaces
    }
}
