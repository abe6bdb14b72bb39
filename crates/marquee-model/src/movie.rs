// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::MovieId;
use crate::validation::{
    normalize_optional_trimmed, require_non_empty, require_trimmed, validate_rating, FieldError,
    ValidationError,
};

pub const RATING_MIN: u8 = 1;
pub const RATING_MAX: u8 = 5;
pub const AVERAGE_RATING_MIN: f64 = 0.0;
pub const AVERAGE_RATING_MAX: f64 = 5.0;

/// Arithmetic mean of every rating; zero for an empty list.
#[must_use]
pub fn average_rating(reviews: &[Review]) -> f64 {
    if reviews.is_empty() {
        return 0.0;
    }
    let total: u64 = reviews.iter().map(|r| u64::from(r.rating)).sum();
    total as f64 / reviews.len() as f64
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Review {
    pub username: String,
    pub rating: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl Review {
    #[must_use]
    pub fn from_input(input: NewReview, created_at: DateTime<Utc>) -> Self {
        Self {
            username: input.username,
            rating: input.rating,
            comment: input.comment,
            created_at,
        }
    }

    fn collect_errors(&self, idx: usize, errors: &mut ValidationError) {
        let prefix = format!("reviews[{idx}]");
        if self.username.trim().is_empty() {
            errors.push(FieldError::required(&format!("{prefix}.username")));
        }
        if self.comment.trim().is_empty() {
            errors.push(FieldError::required(&format!("{prefix}.comment")));
        }
        if let Err(e) = validate_rating(&format!("{prefix}.rating"), i64::from(self.rating)) {
            errors.push(e);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Movie {
    #[serde(rename = "_id")]
    pub id: MovieId,
    pub title: String,
    pub year: i32,
    pub genre: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    #[serde(default)]
    pub average_rating: f64,
    #[serde(default)]
    pub reviews: Vec<Review>,
    pub created_at: DateTime<Utc>,
}

impl Movie {
    /// Fresh movie: no reviews, rating zero.
    #[must_use]
    pub fn create(id: MovieId, input: NewMovie, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: input.title,
            year: input.year,
            genre: input.genre,
            description: input.description,
            director: input.director,
            average_rating: 0.0,
            reviews: Vec::new(),
            created_at,
        }
    }

    /// Replaces only the fields the patch carries.
    pub fn apply_patch(&mut self, patch: &MoviePatch) {
        if let Some(title) = &patch.title {
            self.title.clone_from(title);
        }
        if let Some(year) = patch.year {
            self.year = year;
        }
        if let Some(genre) = &patch.genre {
            self.genre.clone_from(genre);
        }
        if let Some(description) = &patch.description {
            self.description.clone_from(description);
        }
        if let Some(director) = &patch.director {
            self.director.clone_from(director);
        }
    }

    /// Appends and recomputes the mean from the whole list.
    pub fn append_review(&mut self, review: Review) {
        self.reviews.push(review);
        self.recompute_average();
    }

    pub fn recompute_average(&mut self) {
        self.average_rating = average_rating(&self.reviews);
    }

    /// Document-level check run by the store before every write.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::default();
        if self.title.trim().is_empty() {
            errors.push(FieldError::required("title"));
        }
        if self.genre.trim().is_empty() {
            errors.push(FieldError::required("genre"));
        }
        if self.description.is_empty() {
            errors.push(FieldError::required("description"));
        }
        if !self.average_rating.is_finite()
            || self.average_rating < AVERAGE_RATING_MIN
            || self.average_rating > AVERAGE_RATING_MAX
        {
            errors.push(FieldError::new(
                "averageRating",
                format!(
                    "must be between {AVERAGE_RATING_MIN} and {AVERAGE_RATING_MAX}, got {}",
                    self.average_rating
                ),
            ));
        }
        for (idx, review) in self.reviews.iter().enumerate() {
            review.collect_errors(idx, &mut errors);
        }
        errors.into_result()
    }
}

/// Validated create input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMovie {
    pub title: String,
    pub year: i32,
    pub genre: String,
    pub description: String,
    pub director: Option<String>,
}

impl NewMovie {
    pub fn new(
        title: &str,
        year: i32,
        genre: &str,
        description: &str,
        director: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let mut errors = ValidationError::default();
        let title = require_trimmed("title", title).map_err(|e| errors.push(e));
        let genre = require_trimmed("genre", genre).map_err(|e| errors.push(e));
        let description = require_non_empty("description", description).map_err(|e| errors.push(e));
        match (title, genre, description) {
            (Ok(title), Ok(genre), Ok(description)) => Ok(Self {
                title,
                year,
                genre,
                description,
                director: normalize_optional_trimmed(director),
            }),
            _ => Err(errors),
        }
    }
}

/// Validated partial update. `director: Some(None)` clears the director.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MoviePatch {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub genre: Option<String>,
    pub description: Option<String>,
    pub director: Option<Option<String>>,
}

impl MoviePatch {
    pub fn new(
        title: Option<&str>,
        year: Option<i32>,
        genre: Option<&str>,
        description: Option<&str>,
        director: Option<Option<&str>>,
    ) -> Result<Self, ValidationError> {
        let mut errors = ValidationError::default();
        let title = title
            .map(|t| require_trimmed("title", t))
            .transpose()
            .unwrap_or_else(|e| {
                errors.push(e);
                None
            });
        let genre = genre
            .map(|g| require_trimmed("genre", g))
            .transpose()
            .unwrap_or_else(|e| {
                errors.push(e);
                None
            });
        let description = description
            .map(|d| require_non_empty("description", d))
            .transpose()
            .unwrap_or_else(|e| {
                errors.push(e);
                None
            });
        errors.into_result()?;
        Ok(Self {
            title,
            year,
            genre,
            description,
            director: director.map(normalize_optional_trimmed),
        })
    }
}

/// Validated review input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview {
    pub username: String,
    pub rating: u8,
    pub comment: String,
}

impl NewReview {
    pub fn new(username: &str, rating: i64, comment: &str) -> Result<Self, ValidationError> {
        let mut errors = ValidationError::default();
        let username = require_trimmed("username", username).map_err(|e| errors.push(e));
        let rating = validate_rating("rating", rating).map_err(|e| errors.push(e));
        let comment = require_trimmed("comment", comment).map_err(|e| errors.push(e));
        match (username, rating, comment) {
            (Ok(username), Ok(rating), Ok(comment)) => Ok(Self {
                username,
                rating,
                comment,
            }),
            _ => Err(errors),
        }
    }
}
