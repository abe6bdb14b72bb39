#![forbid(unsafe_code)]

mod contracts;
mod error;
mod location;
mod schema;
mod sqlite;

pub use contracts::{CatalogStats, MovieRead, MovieStore, MovieWrite, StoreAdmin};
pub use error::{StoreError, StoreErrorCode};
pub use location::StoreLocation;
pub use schema::{MOVIES_SCHEMA_SQL, SCHEMA_VERSION};
pub use sqlite::SqliteMovieStore;

pub const CRATE_NAME: &str = "marquee-store";
