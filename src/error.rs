//! Unified error handling
//!
//! `EstimateError` is the pipeline taxonomy; `ApiError` turns failures into
//! consistent HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::domain::{EstimateFailure, FailureStage, ProcessId};

/// Legacy engine operation that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelegateOperation {
    AnalyzeProcess,
    AnalyzeRisk,
}

impl std::fmt::Display for DelegateOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::AnalyzeProcess => "analyze_process",
            Self::AnalyzeRisk => "analyze_risk",
        })
    }
}

#[derive(Debug, Error)]
pub enum EstimateError {
    /// Malformed request, rejected before entering the pipeline
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Legacy engine {operation} failed: {message}")]
    DelegateEngine {
        operation: DelegateOperation,
        message: String,
    },

    /// Fatal condition tied to one process; the single outward shape
    #[error("Estimate failed at {stage} for {process}: {reason}")]
    Calculation {
        process: ProcessId,
        reason: String,
        stage: FailureStage,
    },

    /// Nothing left to cost after scope selection
    #[error("{0}")]
    EmptyScope(String),
}

impl EstimateError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn calculation(process: ProcessId, reason: impl Into<String>, stage: FailureStage) -> Self {
        Self::Calculation {
            process,
            reason: reason.into(),
            stage,
        }
    }

    /// Stage to report when this error aborts an estimate
    pub fn stage(&self) -> FailureStage {
        match self {
            Self::InvalidInput(_) => FailureStage::InputValidation,
            Self::DelegateEngine {
                operation: DelegateOperation::AnalyzeRisk,
                ..
            } => FailureStage::RiskRefinement,
            Self::DelegateEngine { .. } => FailureStage::ProcessDelegation,
            Self::Calculation { stage, .. } => *stage,
            Self::EmptyScope(_) => FailureStage::ScopeSelection,
        }
    }

    /// Collapse into the failure record carried by a failed estimate
    pub fn into_failure(self) -> EstimateFailure {
        let stage = self.stage();
        match self {
            Self::Calculation {
                process, reason, ..
            } => EstimateFailure {
                failed_processes: vec![process],
                reasons: vec![reason],
                stage,
            },
            Self::EmptyScope(reason) | Self::InvalidInput(reason) => EstimateFailure {
                failed_processes: Vec::new(),
                reasons: vec![reason],
                stage,
            },
            other @ Self::DelegateEngine { .. } => EstimateFailure {
                failed_processes: Vec::new(),
                reasons: vec![other.to_string()],
                stage,
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unprocessable: {0}")]
    Unprocessable(String),
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Unprocessable(_) => "UNPROCESSABLE",
        }
    }

    fn public_message(&self) -> String {
        match self {
            Self::BadRequest(msg) | Self::Unprocessable(msg) => msg.clone(),
        }
    }
}

impl From<EstimateError> for ApiError {
    fn from(err: EstimateError) -> Self {
        match err {
            EstimateError::InvalidInput(msg) => Self::BadRequest(msg),
            other => Self::Unprocessable(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self, "API error");

        let status = self.status_code();
        let body = ErrorResponse {
            code: self.error_code().to_string(),
            message: self.public_message(),
        };

        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
