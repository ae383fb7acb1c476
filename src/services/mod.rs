//! Service layer: pricing catalogs and the legacy engine client.

pub mod catalog;
pub mod legacy_client;
pub mod pricing;
pub mod resilient;

pub use catalog::{InMemoryCatalog, PgPricingCatalog};
pub use legacy_client::{LegacyEngine, LegacyEngineClient, LegacyEngineError};
pub use pricing::{LaborRateLookup, MaterialPriceLookup, PricingError};
pub use resilient::{ResilientPricing, RetryPolicy, RetryableError};
