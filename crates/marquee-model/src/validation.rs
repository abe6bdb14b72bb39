// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::movie::{RATING_MAX, RATING_MIN};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldError {
    pub field: String,
    pub reason: String,
}

impl FieldError {
    #[must_use]
    pub fn new(field: &str, reason: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn required(field: &str) -> Self {
        Self::new(field, "is required")
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "`{}` {}", self.field, self.reason)
    }
}

/// Every failing field of one input, in field order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationError {
    pub field_errors: Vec<FieldError>,
}

impl ValidationError {
    #[must_use]
    pub fn single(error: FieldError) -> Self {
        Self {
            field_errors: vec![error],
        }
    }

    pub fn push(&mut self, error: FieldError) {
        self.field_errors.push(error);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.field_errors.is_empty()
    }

    /// `Ok(())` when nothing was collected.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("validation failed: ")?;
        for (idx, err) in self.field_errors.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Trims and rejects empty results.
pub fn require_trimmed(field: &str, raw: &str) -> Result<String, FieldError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FieldError::required(field));
    }
    Ok(trimmed.to_string())
}

/// Rejects the empty string but keeps surrounding whitespace.
pub fn require_non_empty(field: &str, raw: &str) -> Result<String, FieldError> {
    if raw.is_empty() {
        return Err(FieldError::required(field));
    }
    Ok(raw.to_string())
}

#[must_use]
pub fn normalize_optional_trimmed(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

pub fn validate_rating(field: &str, value: i64) -> Result<u8, FieldError> {
    if value < i64::from(RATING_MIN) || value > i64::from(RATING_MAX) {
        return Err(FieldError::new(
            field,
            format!("must be between {RATING_MIN} and {RATING_MAX}, got {value}"),
        ));
    }
    u8::try_from(value).map_err(|_| FieldError::new(field, "out of range"))
}

pub fn validate_year(field: &str, value: i64) -> Result<i32, FieldError> {
    i32::try_from(value).map_err(|_| FieldError::new(field, format!("out of range: {value}")))
}
