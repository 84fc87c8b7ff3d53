//! Core error taxonomy for the optimization orchestrator.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// The closed set of error codes the HTTP surface ever returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorCode {
    #[serde(rename = "E.PARAM_INVALID")]
    ParamInvalid,
    #[serde(rename = "E.FORBIDDEN")]
    Forbidden,
    #[serde(rename = "E.NOT_FOUND")]
    NotFound,
    #[serde(rename = "E.INTERNAL")]
    Internal,
}

impl ErrorCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorCode::ParamInvalid => "E.PARAM_INVALID",
            ErrorCode::Forbidden => "E.FORBIDDEN",
            ErrorCode::NotFound => "E.NOT_FOUND",
            ErrorCode::Internal => "E.INTERNAL",
        }
    }

    pub const fn http_status(self) -> u16 {
        match self {
            ErrorCode::ParamInvalid => 400,
            ErrorCode::Forbidden => 403,
            ErrorCode::NotFound => 404,
            ErrorCode::Internal => 500,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The orchestrator's single error type. Every public operation returns
/// `Result<T, OrchestratorError>`; the HTTP layer maps this onto
/// `{detail: {code, message, details?}}`.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{code}: {message}")]
pub struct OrchestratorError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<Value>,
}

impl OrchestratorError {
    pub fn param_invalid(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::ParamInvalid,
            message: message.into(),
            details: None,
        }
    }

    pub fn param_invalid_with(message: impl Into<String>, details: Value) -> Self {
        Self {
            code: ErrorCode::ParamInvalid,
            message: message.into(),
            details: Some(details),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Forbidden,
            message: message.into(),
            details: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::NotFound,
            message: message.into(),
            details: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Internal,
            message: message.into(),
            details: None,
        }
    }
}

pub type Result<T> = std::result::Result<T, OrchestratorError>;
