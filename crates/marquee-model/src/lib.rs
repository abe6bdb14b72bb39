#![forbid(unsafe_code)]
//! Movie catalog model.
//!
//! `Movie` is the aggregate root; `Review` values exist only inside a movie's
//! review list. Every write path goes through the validating constructors in
//! this crate, and `averageRating` is only ever produced by
//! [`average_rating`].

mod id;
mod movie;
mod validation;

pub use id::MovieId;
pub use movie::{
    average_rating, Movie, MoviePatch, NewMovie, NewReview, Review, AVERAGE_RATING_MAX,
    AVERAGE_RATING_MIN, RATING_MAX, RATING_MIN,
};
pub use validation::{
    normalize_optional_trimmed, require_non_empty, require_trimmed, validate_rating,
    validate_year, FieldError, ValidationError,
};

pub const CRATE_NAME: &str = "marquee-model";
