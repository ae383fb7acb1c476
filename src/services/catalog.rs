//! Pricing catalog backends.
//!
//! `PgPricingCatalog` reads the `materials`, `labor_productivity` and
//! `labor_costs` tables. `InMemoryCatalog` serves the same contract from
//! process memory and backs tests and database-less deployments.

use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::{debug, instrument};

use crate::domain::{BrandColumn, DataOrigin, PricingProcess, ProcessId};
use crate::engine::estimate::tables;
use crate::services::pricing::{
    LaborQuote, LaborRateLookup, LaborRequest, MaterialPriceLookup, MaterialQuote,
    MaterialRequest, PricingError,
};

// ============================================================================
// Database Row Types
// ============================================================================

#[derive(Debug, sqlx::FromRow)]
struct MaterialRow {
    id: String,
    product_name: Option<String>,
    unit: Option<String>,
    price: Option<sqlx::types::Decimal>,
    price_argen: Option<sqlx::types::Decimal>,
}

#[derive(Debug, sqlx::FromRow)]
struct ProductivityRow {
    daily_output: Option<sqlx::types::Decimal>,
    crew_size: Option<i32>,
}

#[derive(Debug, sqlx::FromRow)]
struct LaborCostRow {
    daily_rate: Option<sqlx::types::Decimal>,
}

fn decimal_to_f64(d: sqlx::types::Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

fn db_error(e: sqlx::Error) -> PricingError {
    PricingError::Unavailable(format!("Database error: {}", e))
}

/// Materials and labor rates stored in PostgreSQL
#[derive(Clone)]
pub struct PgPricingCatalog {
    pool: PgPool,
}

impl PgPricingCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MaterialPriceLookup for PgPricingCatalog {
    #[instrument(skip(self, request), fields(category = %request.category.category2))]
    async fn lookup_material(&self, request: &MaterialRequest) -> Result<MaterialQuote, PricingError> {
        let column = request.brand_column.column_name();
        // Entry grade takes the cheapest match, higher grades the most expensive
        let order = match request.brand_column {
            BrandColumn::BrandBasic => "ASC",
            BrandColumn::BrandArgen | BrandColumn::BrandPremium => "DESC",
        };
        let sql = format!(
            r#"
            SELECT id::text AS id, product_name, unit, price, price_argen
            FROM materials
            WHERE is_active = true
            AND is_argen_standard = true
            AND category_1 = $1
            AND category_2 = $2
            AND ($3::text IS NULL OR category_3 = $3)
            AND {column} IS NOT NULL
            ORDER BY price {order} NULLS LAST
            LIMIT 1
            "#
        );

        let row = sqlx::query_as::<_, MaterialRow>(&sql)
            .bind(&request.category.category1)
            .bind(&request.category.category2)
            .bind(&request.category.category3)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?
            .ok_or_else(|| {
                PricingError::NotFound(format!(
                    "{}/{} ({})",
                    request.category.category1, request.category.category2, column
                ))
            })?;

        let price = match request.brand_column {
            BrandColumn::BrandArgen => row.price_argen.or(row.price),
            BrandColumn::BrandBasic | BrandColumn::BrandPremium => row.price.or(row.price_argen),
        }
        .map(decimal_to_f64)
        .unwrap_or(0.0);

        if price <= 0.0 {
            return Err(PricingError::InvalidPrice(format!(
                "material {} has price {}",
                row.id, price
            )));
        }

        debug!(material_id = %row.id, price, "Material price found");

        Ok(MaterialQuote {
            product_name: row
                .product_name
                .unwrap_or_else(|| request.category.category2.clone()),
            unit: row.unit.unwrap_or_else(|| request.quantity.unit.clone()),
            material_id: row.id,
            price,
        })
    }
}

#[async_trait]
impl LaborRateLookup for PgPricingCatalog {
    #[instrument(skip(self, request), fields(process = %request.process))]
    async fn lookup_labor(&self, request: &LaborRequest) -> Result<LaborQuote, PricingError> {
        let phase = request.process.as_str();

        let productivity = sqlx::query_as::<_, ProductivityRow>(
            r#"
            SELECT daily_output, crew_size
            FROM labor_productivity
            WHERE phase_id = $1 AND is_active = true
            LIMIT 1
            "#,
        )
        .bind(phase)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?
        .ok_or_else(|| PricingError::NotFound(format!("labor productivity for {}", phase)))?;

        let cost = sqlx::query_as::<_, LaborCostRow>(
            r#"
            SELECT daily_rate
            FROM labor_costs
            WHERE phase_id = $1 AND is_current = true
            LIMIT 1
            "#,
        )
        .bind(phase)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?
        .ok_or_else(|| PricingError::NotFound(format!("labor cost for {}", phase)))?;

        let rate = cost.daily_rate.map(decimal_to_f64).unwrap_or(0.0);
        if rate <= 0.0 {
            return Err(PricingError::InvalidPrice(format!(
                "labor rate for {} is {}",
                phase, rate
            )));
        }

        let daily_output = productivity
            .daily_output
            .map(decimal_to_f64)
            .filter(|v| *v > 0.0)
            .unwrap_or(request.daily_output);
        let crew_size = productivity
            .crew_size
            .and_then(|c| u32::try_from(c).ok())
            .filter(|c| *c > 0)
            .unwrap_or(request.crew_size);

        Ok(LaborQuote {
            daily_output,
            crew_size,
            rate_per_person_day: rate,
        })
    }
}

/// Catalog held in memory, keyed by material category and brand column
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    materials: HashMap<(String, BrandColumn), MaterialQuote>,
    labor_rates: HashMap<PricingProcess, f64>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_material(
        mut self,
        category2: impl Into<String>,
        brand_column: BrandColumn,
        quote: MaterialQuote,
    ) -> Self {
        self.materials.insert((category2.into(), brand_column), quote);
        self
    }

    pub fn with_labor_rate(mut self, process: PricingProcess, rate_per_person_day: f64) -> Self {
        self.labor_rates.insert(process, rate_per_person_day);
        self
    }

    pub fn without_labor_rate(mut self, process: PricingProcess) -> Self {
        self.labor_rates.remove(&process);
        self
    }

    /// Reference prices in KRW for every costed material and labor phase
    pub fn seeded() -> Self {
        const MATERIAL_PRICES: [(ProcessId, &str, [f64; 3]); 8] = [
            (ProcessId::KitchenCore, "System kitchen", [4_500_000.0, 6_500_000.0, 9_800_000.0]),
            (ProcessId::BathroomWaterproofing, "Bathroom set", [3_200_000.0, 4_500_000.0, 6_800_000.0]),
            (ProcessId::StorageSystem, "Built-in closet", [1_200_000.0, 1_800_000.0, 2_800_000.0]),
            (ProcessId::Lighting, "LED downlight", [18_000.0, 28_000.0, 45_000.0]),
            (ProcessId::Flooring, "Engineered wood flooring", [35_000.0, 52_000.0, 85_000.0]),
            (ProcessId::Wallpaper, "Silk wallpaper", [6_000.0, 9_000.0, 15_000.0]),
            (ProcessId::Window, "Double-glazed window", [650_000.0, 900_000.0, 1_400_000.0]),
            (ProcessId::Door, "Room door", [250_000.0, 380_000.0, 600_000.0]),
        ];
        const LABOR_RATES: [(PricingProcess, f64); 8] = [
            (PricingProcess::Finish, 250_000.0),
            (PricingProcess::Kitchen, 300_000.0),
            (PricingProcess::Bathroom, 300_000.0),
            (PricingProcess::Storage, 250_000.0),
            (PricingProcess::Electric, 280_000.0),
            (PricingProcess::Window, 280_000.0),
            (PricingProcess::Door, 250_000.0),
            (PricingProcess::Demolition, 220_000.0),
        ];
        const COLUMNS: [BrandColumn; 3] = [
            BrandColumn::BrandBasic,
            BrandColumn::BrandArgen,
            BrandColumn::BrandPremium,
        ];

        let mut catalog = Self::new();
        for (process, name, prices) in MATERIAL_PRICES {
            let Some(spec) = tables::material_spec(process) else {
                continue;
            };
            for (column, price) in COLUMNS.into_iter().zip(prices) {
                catalog = catalog.with_material(
                    spec.category2,
                    column,
                    MaterialQuote {
                        material_id: format!("{}-{}", spec.category2, column.column_name()),
                        product_name: name.to_string(),
                        unit: spec.unit.to_string(),
                        price,
                    },
                );
            }
        }
        for (process, rate) in LABOR_RATES {
            catalog = catalog.with_labor_rate(process, rate);
        }
        catalog
    }
}

#[async_trait]
impl MaterialPriceLookup for InMemoryCatalog {
    async fn lookup_material(&self, request: &MaterialRequest) -> Result<MaterialQuote, PricingError> {
        let key = (request.category.category2.clone(), request.brand_column);
        let quote = self.materials.get(&key).ok_or_else(|| {
            PricingError::NotFound(format!(
                "{}/{} ({})",
                request.category.category1,
                request.category.category2,
                request.brand_column.column_name()
            ))
        })?;

        if quote.price <= 0.0 {
            return Err(PricingError::InvalidPrice(format!(
                "material {} has price {}",
                quote.material_id, quote.price
            )));
        }
        Ok(quote.clone())
    }

    fn origin(&self) -> DataOrigin {
        DataOrigin::Fallback
    }
}

#[async_trait]
impl LaborRateLookup for InMemoryCatalog {
    async fn lookup_labor(&self, request: &LaborRequest) -> Result<LaborQuote, PricingError> {
        let rate = self
            .labor_rates
            .get(&request.process)
            .copied()
            .ok_or_else(|| PricingError::NotFound(format!("labor cost for {}", request.process)))?;

        if rate <= 0.0 {
            return Err(PricingError::InvalidPrice(format!(
                "labor rate for {} is {}",
                request.process, rate
            )));
        }

        Ok(LaborQuote {
            daily_output: request.daily_output,
            crew_size: request.crew_size,
            rate_per_person_day: rate,
        })
    }

    fn origin(&self) -> DataOrigin {
        DataOrigin::Fallback
    }
}
