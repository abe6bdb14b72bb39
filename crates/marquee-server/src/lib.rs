#![forbid(unsafe_code)]

use async_trait::async_trait;
use marquee_model::{Movie, MovieId, MoviePatch, Review};
use marquee_store::StoreError;

mod config;
mod http;
mod middleware;
mod runtime;
mod store;

pub const CRATE_NAME: &str = "marquee-server";

pub use config::{validate_startup_config, ApiConfig, CORS_ANY_ORIGIN};
pub use runtime::server_runtime_app::{build_router, AppState};
pub use store::blocking::BlockingStoreBackend;
pub use store::fake::FakeStore;

/// Async view of the movie store used by the handlers.
///
/// Implementations own their blocking work; handlers only bound each call
/// with the request timeout.
#[async_trait]
pub trait MovieBackend: Send + Sync + 'static {
    fn backend_tag(&self) -> &'static str {
        "unknown"
    }

    async fn list_movies(&self) -> Result<Vec<Movie>, StoreError>;
    async fn get_movie(&self, id: MovieId) -> Result<Movie, StoreError>;
    async fn insert_movie(&self, movie: Movie) -> Result<Movie, StoreError>;
    async fn update_movie(&self, id: MovieId, patch: MoviePatch) -> Result<Movie, StoreError>;
    async fn delete_movie(&self, id: MovieId) -> Result<Movie, StoreError>;
    async fn append_review(&self, id: MovieId, review: Review) -> Result<Movie, StoreError>;
    async fn ping(&self) -> Result<(), StoreError>;
}
