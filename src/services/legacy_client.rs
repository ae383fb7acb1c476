//! Client for the legacy scoring engine.
//!
//! The engine speaks the legacy indicator vocabulary over JSON/HTTP:
//! - Trait analysis from raw questionnaire answers
//! - Process recommendation from indicators
//! - Risk analysis from adjusted indicators and a process result
//!
//! Every call runs under the configured `RetryPolicy`: transport failures,
//! timeouts and 5xx answers are retried, anything else is returned as is.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, instrument};

use crate::domain::legacy::{
    LegacyProcessRequest, LegacyProcessResult, LegacyRiskRequest, LegacyRiskResult,
    LegacyTraitRequest, LegacyTraitResult,
};
use crate::services::resilient::{RetryPolicy, RetryableError};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum LegacyEngineError {
    #[error("legacy engine unavailable: {0}")]
    Transport(String),

    #[error("legacy engine returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("invalid legacy engine response: {0}")]
    InvalidResponse(String),

    #[error("legacy engine timed out after {0:?}")]
    Timeout(Duration),
}

impl RetryableError for LegacyEngineError {
    fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Timeout(_) => true,
            Self::Status { status, .. } => *status >= 500,
            Self::InvalidResponse(_) => false,
        }
    }

    fn timed_out(after: Duration) -> Self {
        Self::Timeout(after)
    }
}

/// Operations delegated to the legacy engine
#[async_trait]
pub trait LegacyEngine: Send + Sync {
    async fn analyze_traits(
        &self,
        request: &LegacyTraitRequest,
    ) -> Result<LegacyTraitResult, LegacyEngineError>;

    async fn analyze_process(
        &self,
        request: &LegacyProcessRequest,
    ) -> Result<LegacyProcessResult, LegacyEngineError>;

    async fn analyze_risk(
        &self,
        request: &LegacyRiskRequest,
    ) -> Result<LegacyRiskResult, LegacyEngineError>;

    async fn health_check(&self) -> Result<(), LegacyEngineError> {
        Ok(())
    }
}

/// HTTP client for the legacy engine service.
#[derive(Clone)]
pub struct LegacyEngineClient {
    client: Client,
    base_url: String,
    token: String,
    retry: RetryPolicy,
}

/// Error body returned by the legacy engine.
#[derive(Debug, Deserialize)]
struct LegacyErrorResponse {
    message: String,
}

impl LegacyEngineClient {
    /// `retry.attempt_timeout` bounds each request, including connect
    pub fn new(base_url: &str, token: &str, retry: RetryPolicy) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(retry.attempt_timeout)
            .build()
            .context("Failed to create HTTP client")?;

        tracing::info!(
            base_url = base_url,
            max_retries = retry.max_retries,
            "Legacy engine client initialized"
        );

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            retry,
        })
    }

    async fn post<T: Serialize + Sync, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<R, LegacyEngineError> {
        self.retry.run(path, || self.send(path, body)).await
    }

    async fn send<T: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<R, LegacyEngineError> {
        let url = format!("{}{}", self.base_url, path);

        debug!(url = %url, "Legacy engine request");

        let response = self
            .client
            .post(&url)
            .header("X-Internal-Token", &self.token)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Legacy engine request failed");
                LegacyEngineError::Transport(e.to_string())
            })?;

        let status = response.status();
        if status.is_success() {
            return response.json::<R>().await.map_err(|e| {
                error!(error = %e, "Failed to parse legacy engine response");
                LegacyEngineError::InvalidResponse(e.to_string())
            });
        }

        let message = response
            .json::<LegacyErrorResponse>()
            .await
            .map(|body| body.message)
            .unwrap_or_else(|_| format!("legacy engine error: {}", status));

        error!(status = %status, message = %message, "Legacy engine error");
        Err(LegacyEngineError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl LegacyEngine for LegacyEngineClient {
    #[instrument(skip(self, request))]
    async fn analyze_traits(
        &self,
        request: &LegacyTraitRequest,
    ) -> Result<LegacyTraitResult, LegacyEngineError> {
        self.post("/v1/traits/analyze", request).await
    }

    #[instrument(skip(self, request))]
    async fn analyze_process(
        &self,
        request: &LegacyProcessRequest,
    ) -> Result<LegacyProcessResult, LegacyEngineError> {
        self.post("/v1/processes/analyze", request).await
    }

    #[instrument(skip(self, request))]
    async fn analyze_risk(
        &self,
        request: &LegacyRiskRequest,
    ) -> Result<LegacyRiskResult, LegacyEngineError> {
        self.post("/v1/risks/analyze", request).await
    }

    async fn health_check(&self) -> Result<(), LegacyEngineError> {
        let url = format!("{}/health", self.base_url);

        self.client
            .get(&url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .map_err(|e| LegacyEngineError::Transport(e.to_string()))?
            .error_for_status()
            .map_err(|e| LegacyEngineError::Status {
                status: e.status().map(|s| s.as_u16()).unwrap_or(0),
                message: e.to_string(),
            })?;

        Ok(())
    }
}
