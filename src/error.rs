//! Error types surfaced by registry operations.

use serde::Serialize;
use serde_json::Value;

/// Serializable error description used in per-entry batch reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

/// Failures raised by the registry before any state is mutated.
///
/// Lookups never fail with "not found"; they return `None` instead.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Malformed input: original URL, validity value or custom code pattern.
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// The requested custom code is already reserved.
    #[error("{message}")]
    Conflict { message: String, details: Value },

    /// Random generation found no free code within the retry budget.
    #[error("{message}")]
    Exhaustion { message: String, details: Value },
}

impl RegistryError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }

    pub fn exhausted(message: impl Into<String>, details: Value) -> Self {
        Self::Exhaustion {
            message: message.into(),
            details,
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation_error",
            Self::Conflict { .. } => "conflict",
            Self::Exhaustion { .. } => "exhaustion",
        }
    }

    pub fn details(&self) -> &Value {
        match self {
            Self::Validation { details, .. }
            | Self::Conflict { details, .. }
            | Self::Exhaustion { details, .. } => details,
        }
    }

    pub fn to_error_info(&self) -> ErrorInfo {
        ErrorInfo {
            code: self.code(),
            message: self.to_string(),
            details: self.details().clone(),
        }
    }
}
