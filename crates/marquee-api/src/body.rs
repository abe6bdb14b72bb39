// SPDX-License-Identifier: Apache-2.0

//! Request-body parsing.
//!
//! Bodies arrive as loosely typed JSON objects. Each parser collects type
//! errors and model validation errors for every field before failing, so a
//! client sees all problems in one response. Server-owned keys (`_id`,
//! `averageRating`, `reviews`, `createdAt`) and unknown keys are ignored.

use marquee_model::{
    validate_year, FieldError, MovieId, MoviePatch, NewMovie, NewReview, ValidationError,
    RATING_MIN,
};
use serde_json::{Map, Value};

use crate::ApiError;

type Object = Map<String, Value>;

pub fn parse_movie_id(raw: &str) -> Result<MovieId, ApiError> {
    MovieId::parse(raw).map_err(|_| ApiError::malformed_id(raw))
}

pub fn parse_new_movie(body: &Value) -> Result<NewMovie, ApiError> {
    let obj = as_object(body)?;
    let mut errors = ValidationError::default();
    let title = string_field(obj, "title", &mut errors);
    let year = integer_field(obj, "year", &mut errors)
        .and_then(|y| validate_year("year", y).map_err(|e| errors.push(e)).ok());
    let genre = string_field(obj, "genre", &mut errors);
    let description = string_field(obj, "description", &mut errors);
    let director = string_field(obj, "director", &mut errors);
    if year.is_none() && !has_error(&errors, "year") {
        errors.push(FieldError::required("year"));
    }

    let checked = NewMovie::new(
        title.as_deref().unwrap_or_default(),
        year.unwrap_or_default(),
        genre.as_deref().unwrap_or_default(),
        description.as_deref().unwrap_or_default(),
        director.as_deref(),
    );
    finish(checked, errors)
}

/// Absent keys leave the field untouched; `director: null` or a blank
/// director clears it. `null` on any other field is a missing required value.
pub fn parse_movie_patch(body: &Value) -> Result<MoviePatch, ApiError> {
    let obj = as_object(body)?;
    let mut errors = ValidationError::default();
    for field in ["title", "year", "genre", "description"] {
        if matches!(obj.get(field), Some(Value::Null)) {
            errors.push(FieldError::required(field));
        }
    }
    let title = string_field(obj, "title", &mut errors);
    let year = integer_field(obj, "year", &mut errors)
        .and_then(|y| validate_year("year", y).map_err(|e| errors.push(e)).ok());
    let genre = string_field(obj, "genre", &mut errors);
    let description = string_field(obj, "description", &mut errors);
    let director = match obj.get("director") {
        None => None,
        Some(Value::Null) => Some(None),
        Some(_) => string_field(obj, "director", &mut errors).map(Some),
    };

    let checked = MoviePatch::new(
        title.as_deref(),
        year,
        genre.as_deref(),
        description.as_deref(),
        director.as_ref().map(Option::as_deref),
    );
    finish(checked, errors)
}

pub fn parse_new_review(body: &Value) -> Result<NewReview, ApiError> {
    let obj = as_object(body)?;
    let mut errors = ValidationError::default();
    let username = string_field(obj, "username", &mut errors);
    let rating = integer_field(obj, "rating", &mut errors);
    let comment = string_field(obj, "comment", &mut errors);
    if rating.is_none() && !has_error(&errors, "rating") {
        errors.push(FieldError::required("rating"));
    }

    let checked = NewReview::new(
        username.as_deref().unwrap_or_default(),
        // Keeps the range check quiet for a rating already reported above.
        rating.unwrap_or(i64::from(RATING_MIN)),
        comment.as_deref().unwrap_or_default(),
    );
    finish(checked, errors)
}

fn as_object(body: &Value) -> Result<&Object, ApiError> {
    body.as_object()
        .ok_or_else(|| ApiError::invalid_body("expected a JSON object"))
}

/// Merges model validation into the type errors already collected. A field
/// reported once is not reported again.
fn finish<T>(checked: Result<T, ValidationError>, mut errors: ValidationError) -> Result<T, ApiError> {
    let value = match checked {
        Ok(value) => Some(value),
        Err(model) => {
            for e in model.field_errors {
                if !has_error(&errors, &e.field) {
                    errors.push(e);
                }
            }
            None
        }
    };
    match value {
        Some(value) if errors.is_empty() => Ok(value),
        _ => {
            errors.field_errors.sort_by_key(|e| field_rank(&e.field));
            Err(ApiError::validation_failed(&errors))
        }
    }
}

const FIELD_ORDER: [&str; 8] = [
    "title",
    "year",
    "genre",
    "description",
    "director",
    "username",
    "rating",
    "comment",
];

fn field_rank(field: &str) -> usize {
    FIELD_ORDER
        .iter()
        .position(|f| *f == field)
        .unwrap_or(FIELD_ORDER.len())
}

fn has_error(errors: &ValidationError, field: &str) -> bool {
    errors.field_errors.iter().any(|e| e.field == field)
}

/// `None` for absent or null keys; wrong types are recorded.
fn string_field(obj: &Object, field: &str, errors: &mut ValidationError) -> Option<String> {
    match obj.get(field) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.push(FieldError::new(field, "must be a string"));
            None
        }
    }
}

/// Integers, whole floats such as `4.0`, or strings holding an integer, as
/// the browser form posts them.
fn integer_field(obj: &Object, field: &str, errors: &mut ValidationError) -> Option<i64> {
    let parsed = match obj.get(field) {
        None | Some(Value::Null) => return None,
        Some(Value::Number(n)) => n.as_i64().or_else(|| whole_number(n.as_f64()?)),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        Some(_) => None,
    };
    if parsed.is_none() {
        errors.push(FieldError::new(field, "must be an integer"));
    }
    parsed
}

fn whole_number(f: f64) -> Option<i64> {
    // Bounds keep the cast exact; larger magnitudes fail validation anyway.
    (f.fract() == 0.0 && f.abs() < 1e15).then_some(f as i64)
}
