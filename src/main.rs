use anyhow::{Context, Result};
use std::sync::Arc;

use renovation_estimator::{
    app,
    config::{self, PricingSource},
    db,
    engine::Estimator,
    logging,
    services::{InMemoryCatalog, LegacyEngine, LegacyEngineClient, PgPricingCatalog, ResilientPricing},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let settings = config::Settings::from_env()?;

    logging::init_logging(&settings.env);

    tracing::info!(
        env = ?settings.env,
        server_addr = %settings.server_addr,
        pricing_source = ?settings.pricing_source,
        "Starting renovation estimator"
    );

    let policy = settings.retry_policy();

    // Pricing catalog
    let (pool, estimator) = match settings.pricing_source {
        PricingSource::Db => {
            let database_url = settings
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set when PRICING_SOURCE=db")?;
            let pool = db::create_pool(database_url, settings.database_max_connections).await?;
            let catalog = ResilientPricing::new(PgPricingCatalog::new(pool.clone()), policy);
            (Some(pool), Estimator::from_catalog(catalog))
        }
        PricingSource::Memory => {
            tracing::warn!("Using the seeded in-memory pricing catalog");
            (None, Estimator::from_catalog(InMemoryCatalog::seeded()))
        }
    };

    // Legacy scoring engine
    let estimator = match &settings.legacy_engine {
        Some(legacy) => {
            let client = LegacyEngineClient::new(&legacy.url, &legacy.token, legacy.retry_policy())?;

            // Non-blocking warm-up check
            tokio::spawn({
                let client = client.clone();
                async move {
                    match client.health_check().await {
                        Ok(()) => tracing::info!("Legacy engine is healthy"),
                        Err(e) => tracing::warn!(error = %e, "Legacy engine health check failed - will retry on first request"),
                    }
                }
            });

            estimator.with_legacy_engine(Arc::new(client))
        }
        None => {
            tracing::info!("No legacy engine configured, trait scores use the neutral fallback");
            estimator
        }
    };

    let state = app::AppState::new(pool, settings.clone(), estimator);

    let app = app::create_app(state);

    let listener = tokio::net::TcpListener::bind(&settings.server_addr).await?;
    tracing::info!("Listening on {}", settings.server_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
