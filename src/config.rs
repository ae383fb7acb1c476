use anyhow::{bail, Context, Result};
use std::env;
use std::time::Duration;

use crate::services::RetryPolicy;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Staging,
    Prod,
}

impl Environment {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "prod" | "production" => Self::Prod,
            "staging" => Self::Staging,
            _ => Self::Dev,
        }
    }

    pub fn is_dev(&self) -> bool {
        matches!(self, Self::Dev)
    }

    pub fn is_prod(&self) -> bool {
        matches!(self, Self::Prod)
    }
}

/// Where material and labor prices come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingSource {
    /// PostgreSQL pricing catalog
    Db,
    /// Seeded in-memory catalog, no database needed
    Memory,
}

impl PricingSource {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "db" | "database" | "postgres" => Ok(Self::Db),
            "memory" | "in-memory" => Ok(Self::Memory),
            other => bail!("PRICING_SOURCE must be 'db' or 'memory', got '{other}'"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LegacyEngineSettings {
    pub url: String,
    pub token: String,
    pub timeout_seconds: u64,
    pub max_retries: u32,
}

impl LegacyEngineSettings {
    /// Each attempt gets the full timeout; the budget covers every attempt
    pub fn retry_policy(&self) -> RetryPolicy {
        let attempt_timeout = Duration::from_secs(self.timeout_seconds);
        RetryPolicy {
            attempt_timeout,
            max_retries: self.max_retries,
            max_elapsed: attempt_timeout * (self.max_retries + 1),
            ..RetryPolicy::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub env: Environment,
    pub server_addr: String,

    // Pricing
    pub pricing_source: PricingSource,
    pub pricing_timeout_ms: u64,
    pub pricing_max_retries: u32,
    pub pricing_retry_budget_ms: u64,

    // Database
    pub database_url: Option<String>,
    pub database_max_connections: u32,

    // CORS
    pub cors_allow_origins: Vec<String>,

    // Legacy scoring engine; unset means traits fall back to neutral scores
    pub legacy_engine: Option<LegacyEngineSettings>,
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let env = Environment::from_str(&env::var("ENV").unwrap_or_else(|_| "dev".to_string()));
        let server_addr = env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        // Pricing
        let pricing_source =
            PricingSource::parse(&env::var("PRICING_SOURCE").unwrap_or_else(|_| "db".to_string()))?;
        let pricing_timeout_ms = parse_or("PRICING_TIMEOUT_MS", 2_000);
        let pricing_max_retries = parse_or("PRICING_MAX_RETRIES", 2);
        let pricing_retry_budget_ms = parse_or("PRICING_RETRY_BUDGET_MS", 5_000);

        // Database
        let database_url = match pricing_source {
            PricingSource::Db => {
                Some(env::var("DATABASE_URL").context("DATABASE_URL must be set when PRICING_SOURCE=db")?)
            }
            PricingSource::Memory => env::var("DATABASE_URL").ok(),
        };
        let database_max_connections = parse_or("DATABASE_MAX_CONNECTIONS", 10);

        // CORS
        let cors_allow_origins = env::var("CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        // Legacy scoring engine
        let legacy_engine = match env::var("LEGACY_ENGINE_URL").ok().filter(|s| !s.trim().is_empty()) {
            Some(raw) => {
                let url = url::Url::parse(&raw).context("LEGACY_ENGINE_URL is not a valid URL")?;
                let token = env::var("LEGACY_ENGINE_TOKEN")
                    .context("LEGACY_ENGINE_TOKEN must be set when LEGACY_ENGINE_URL is set")?;
                Some(LegacyEngineSettings {
                    url: url.as_str().trim_end_matches('/').to_string(),
                    token,
                    timeout_seconds: parse_or("LEGACY_ENGINE_TIMEOUT_SECONDS", 10),
                    max_retries: parse_or("LEGACY_ENGINE_MAX_RETRIES", 1),
                })
            }
            None => None,
        };

        Ok(Settings {
            env,
            server_addr,
            pricing_source,
            pricing_timeout_ms,
            pricing_max_retries,
            pricing_retry_budget_ms,
            database_url,
            database_max_connections,
            cors_allow_origins,
            legacy_engine,
        })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            attempt_timeout: Duration::from_millis(self.pricing_timeout_ms),
            max_retries: self.pricing_max_retries,
            max_elapsed: Duration::from_millis(self.pricing_retry_budget_ms),
            ..RetryPolicy::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pricing_source_accepts_known_values() {
        assert_eq!(PricingSource::parse("memory").unwrap(), PricingSource::Memory);
        assert_eq!(PricingSource::parse(" DB ").unwrap(), PricingSource::Db);
        assert!(PricingSource::parse("redis").is_err());
    }

    #[test]
    fn legacy_retry_budget_covers_every_attempt() {
        let legacy = LegacyEngineSettings {
            url: "http://localhost:9000".into(),
            token: "secret".into(),
            timeout_seconds: 10,
            max_retries: 2,
        };
        let policy = legacy.retry_policy();
        assert_eq!(policy.attempt_timeout, Duration::from_secs(10));
        assert_eq!(policy.max_retries, 2);
        assert_eq!(policy.max_elapsed, Duration::from_secs(30));
    }

    #[test]
    fn unknown_environment_is_dev() {
        assert_eq!(Environment::from_str("qa"), Environment::Dev);
        assert!(Environment::from_str("production").is_prod());
    }
}
