#![forbid(unsafe_code)]
//! Wire contract of the `/api/movies` surface.
//!
//! Nothing here performs I/O. Handlers feed raw JSON bodies and path
//! segments in and get validated model inputs or an [`ApiError`] out.

pub mod body;
pub mod error_mapping;
mod errors;
pub mod openapi;

pub use body::{parse_movie_id, parse_movie_patch, parse_new_movie, parse_new_review};
pub use errors::{ApiError, ApiErrorCode};
pub use openapi::openapi_v1_spec;

pub const CRATE_NAME: &str = "marquee-api";
pub const MOVIES_BASE_PATH: &str = "/api/movies";
pub const MOVIE_DELETED_MESSAGE: &str = "Movie deleted successfully";
