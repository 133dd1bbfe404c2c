//! # Application Error
//!
//! Maps domain errors to structured HTTP responses with proper status
//! codes and error bodies.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use mguard_baseline::BaselineError;
use mguard_core::MguardError;
use mguard_gate::GateError;

/// Application-level error type that maps to HTTP responses.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Request validation failed (bad identifier, unknown gate type,
    /// unconfigured gate, malformed query).
    #[error("validation error: {0}")]
    Validation(String),

    /// A transient write conflict the caller should retry.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = serde_json::json!({
            "error": {
                "code": status.as_u16(),
                "message": self.to_string(),
            }
        });
        (status, axum::Json(body)).into_response()
    }
}

impl From<MguardError> for AppError {
    fn from(e: MguardError) -> Self {
        match e {
            MguardError::Validation(_)
            | MguardError::UnknownGateType(_)
            | MguardError::UnconfiguredGate(_) => AppError::Validation(e.to_string()),
            MguardError::Conflict(_) => AppError::Conflict(e.to_string()),
            MguardError::Serialization(_) | MguardError::Io(_) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<GateError> for AppError {
    fn from(e: GateError) -> Self {
        match e {
            GateError::Unconfigured(_) | GateError::InvalidThreshold { .. } | GateError::Config(_) => {
                AppError::Validation(e.to_string())
            }
            GateError::Conflict { .. } => AppError::Conflict(e.to_string()),
            GateError::Core(inner) => inner.into(),
        }
    }
}

impl From<BaselineError> for AppError {
    fn from(e: BaselineError) -> Self {
        match e {
            BaselineError::NoBaseline(_) => AppError::NotFound(e.to_string()),
            BaselineError::Reader { .. } => AppError::Internal(e.to_string()),
            BaselineError::Core(inner) => inner.into(),
        }
    }
}
