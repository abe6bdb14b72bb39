// SPDX-License-Identifier: Apache-2.0

use marquee_model::ValidationError;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreErrorCode {
    NotFound,
    Validation,
    Conflict,
    Unavailable,
    Unsupported,
    Io,
    Corrupt,
    Internal,
}

impl StoreErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Validation => "validation_error",
            Self::Conflict => "conflict",
            Self::Unavailable => "store_unavailable",
            Self::Unsupported => "unsupported",
            Self::Io => "io_error",
            Self::Corrupt => "corrupt_document",
            Self::Internal => "internal_error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    pub code: StoreErrorCode,
    pub message: String,
    /// Populated for `Validation` failures.
    pub validation: Option<ValidationError>,
}

impl StoreError {
    #[must_use]
    pub fn new(code: StoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            validation: None,
        }
    }

    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::NotFound, message)
    }

    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::Unavailable, message)
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for StoreError {}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self {
            code: StoreErrorCode::Validation,
            message: value.to_string(),
            validation: Some(value),
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        if matches!(value, rusqlite::Error::QueryReturnedNoRows) {
            return Self::not_found(value.to_string());
        }
        let code = match value.sqlite_error_code() {
            Some(rusqlite::ErrorCode::ConstraintViolation) => StoreErrorCode::Conflict,
            Some(
                rusqlite::ErrorCode::DatabaseBusy
                | rusqlite::ErrorCode::DatabaseLocked
                | rusqlite::ErrorCode::CannotOpen
                | rusqlite::ErrorCode::NotADatabase,
            ) => StoreErrorCode::Unavailable,
            Some(rusqlite::ErrorCode::SystemIoFailure | rusqlite::ErrorCode::DiskFull) => {
                StoreErrorCode::Io
            }
            _ => StoreErrorCode::Internal,
        };
        Self::new(code, value.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::new(StoreErrorCode::Corrupt, format!("movie document: {value}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_model::FieldError;

    #[test]
    fn validation_errors_keep_field_details() {
        let err: StoreError = ValidationError::single(FieldError::required("title")).into();
        assert_eq!(err.code, StoreErrorCode::Validation);
        assert_eq!(
            err.validation.as_ref().map(|v| v.field_errors.len()),
            Some(1)
        );
        assert!(err.to_string().starts_with("validation_error: "));
    }

    #[test]
    fn no_rows_maps_to_not_found() {
        let err: StoreError = rusqlite::Error::QueryReturnedNoRows.into();
        assert_eq!(err.code, StoreErrorCode::NotFound);
    }
}
