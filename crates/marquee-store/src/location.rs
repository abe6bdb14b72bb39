// SPDX-License-Identifier: Apache-2.0

use std::fmt::{Display, Formatter};
use std::path::PathBuf;

use crate::error::{StoreError, StoreErrorCode};

/// Parsed store connection string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    Memory,
    File(PathBuf),
}

impl StoreLocation {
    /// Accepts `:memory:`, `sqlite::memory:`, `sqlite://<path>`,
    /// `sqlite:<path>`, or a bare path.
    pub fn parse(raw: &str) -> Result<Self, StoreError> {
        let s = raw.trim();
        if s.is_empty() {
            return Err(StoreError::new(
                StoreErrorCode::Validation,
                "store connection string must not be empty",
            ));
        }
        if matches!(s, ":memory:" | "sqlite::memory:" | "sqlite://:memory:") {
            return Ok(Self::Memory);
        }
        let path = if let Some(rest) = s.strip_prefix("sqlite://") {
            rest
        } else if let Some(rest) = s.strip_prefix("sqlite:") {
            rest
        } else if let Some((scheme, _)) = s.split_once("://") {
            return Err(StoreError::new(
                StoreErrorCode::Unsupported,
                format!("unsupported store scheme `{scheme}`; use sqlite://<path> or :memory:"),
            ));
        } else {
            s
        };
        if path.is_empty() {
            return Err(StoreError::new(
                StoreErrorCode::Validation,
                "store connection string has an empty path",
            ));
        }
        Ok(Self::File(PathBuf::from(path)))
    }
}

impl Display for StoreLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Memory => f.write_str("sqlite::memory:"),
            Self::File(path) => write!(f, "sqlite://{}", path.display()),
        }
    }
}
