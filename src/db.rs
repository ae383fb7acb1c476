//! Database connection pool for the pricing catalog

use anyhow::{Context, Result};
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    PgPool,
};
use std::str::FromStr;
use std::time::Duration;

/// Create a PostgreSQL connection pool for read-mostly catalog lookups
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool> {
    let connect_options = PgConnectOptions::from_str(database_url)
        .context("Invalid DATABASE_URL")?
        .application_name("renovation-estimator");

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(300))
        .max_lifetime(Duration::from_secs(1800))
        .connect_with(connect_options)
        .await
        .context("Failed to connect to PostgreSQL")?;

    tracing::info!(max_connections, "Database connection pool established");

    Ok(pool)
}

pub async fn health_check(pool: &PgPool) -> bool {
    sqlx::query("SELECT 1").fetch_one(pool).await.is_ok()
}
