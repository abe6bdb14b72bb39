// SPDX-License-Identifier: Apache-2.0

use marquee_model::ValidationError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ApiErrorCode {
    ValidationFailed,
    InvalidBody,
    MovieNotFound,
    MalformedId,
    StoreUnavailable,
    Timeout,
    Internal,
}

impl ApiErrorCode {
    pub const ALL: [Self; 7] = [
        Self::ValidationFailed,
        Self::InvalidBody,
        Self::MovieNotFound,
        Self::MalformedId,
        Self::StoreUnavailable,
        Self::Timeout,
        Self::Internal,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ValidationFailed => "ValidationFailed",
            Self::InvalidBody => "InvalidBody",
            Self::MovieNotFound => "MovieNotFound",
            Self::MalformedId => "MalformedId",
            Self::StoreUnavailable => "StoreUnavailable",
            Self::Timeout => "Timeout",
            Self::Internal => "Internal",
        }
    }
}

/// Error body of every non-2xx JSON response. `message` is what the
/// frontend shows to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
    pub details: Value,
}

impl ApiError {
    #[must_use]
    pub fn new(code: ApiErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
        }
    }

    #[must_use]
    pub fn validation_failed(error: &ValidationError) -> Self {
        let field_errors: Vec<Value> = error
            .field_errors
            .iter()
            .map(|e| json!({"field": e.field, "reason": e.reason}))
            .collect();
        Self::new(
            ApiErrorCode::ValidationFailed,
            error.to_string(),
            json!({ "field_errors": field_errors }),
        )
    }

    #[must_use]
    pub fn invalid_body(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self::new(
            ApiErrorCode::InvalidBody,
            format!("invalid request body: {reason}"),
            json!({ "reason": reason }),
        )
    }

    #[must_use]
    pub fn movie_not_found(reason: impl Into<String>) -> Self {
        Self::new(
            ApiErrorCode::MovieNotFound,
            "Movie not found",
            json!({ "reason": reason.into() }),
        )
    }

    #[must_use]
    pub fn malformed_id(raw: &str) -> Self {
        Self::new(
            ApiErrorCode::MalformedId,
            format!("`{raw}` is not a valid movie id"),
            json!({ "id": raw }),
        )
    }

    #[must_use]
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::StoreUnavailable, message, json!({}))
    }

    #[must_use]
    pub fn timeout(operation: &str, timeout_ms: u64) -> Self {
        Self::new(
            ApiErrorCode::Timeout,
            format!("{operation} timed out"),
            json!({ "operation": operation, "timeout_ms": timeout_ms }),
        )
    }

    /// Re-labels a request error as a server fault. Reads and deletes answer
    /// a malformed id this way.
    #[must_use]
    pub fn into_internal(self) -> Self {
        let mut details = self.details;
        if let Value::Object(map) = &mut details {
            map.insert("cause".to_string(), Value::String(self.code.as_str().to_string()));
        }
        Self {
            code: ApiErrorCode::Internal,
            message: self.message,
            details,
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for ApiError {}
