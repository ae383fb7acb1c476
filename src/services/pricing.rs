//! Pricing lookup contracts.
//!
//! Both lookups are record-or-error: a missing record and a non-positive
//! price are failures, never defaulted.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::domain::{BrandColumn, DataOrigin, PricingProcess, Space};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MaterialCategory {
    pub category1: String,
    pub category2: String,
    #[serde(default)]
    pub category3: Option<String>,
}

/// Required quantity and how it was derived
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuantitySpec {
    pub value: f64,
    pub unit: String,
    pub basis: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MaterialRequest {
    pub process: PricingProcess,
    pub space: Space,
    pub category: MaterialCategory,
    pub spec: String,
    pub brand_column: BrandColumn,
    pub quantity: QuantitySpec,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MaterialQuote {
    pub material_id: String,
    pub product_name: String,
    pub unit: String,
    pub price: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LaborUnit {
    M2,
    Ea,
    Set,
}

impl LaborUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::M2 => "m2",
            Self::Ea => "EA",
            Self::Set => "SET",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LaborRequest {
    pub process: PricingProcess,
    pub unit: LaborUnit,
    pub total_quantity: f64,
    pub daily_output: f64,
    pub crew_size: u32,
    pub difficulty_factor: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LaborQuote {
    pub daily_output: f64,
    pub crew_size: u32,
    pub rate_per_person_day: f64,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PricingError {
    #[error("no pricing record: {0}")]
    NotFound(String),

    #[error("pricing record has no usable price: {0}")]
    InvalidPrice(String),

    #[error("pricing source unavailable: {0}")]
    Unavailable(String),

    #[error("pricing lookup timed out after {0:?}")]
    Timeout(Duration),
}

impl PricingError {
    /// Whether another attempt could succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Timeout(_))
    }
}

#[async_trait]
pub trait MaterialPriceLookup: Send + Sync {
    async fn lookup_material(&self, request: &MaterialRequest) -> Result<MaterialQuote, PricingError>;

    /// Where quotes from this source come from
    fn origin(&self) -> DataOrigin {
        DataOrigin::Db
    }
}

#[async_trait]
pub trait LaborRateLookup: Send + Sync {
    async fn lookup_labor(&self, request: &LaborRequest) -> Result<LaborQuote, PricingError>;

    fn origin(&self) -> DataOrigin {
        DataOrigin::Db
    }
}
