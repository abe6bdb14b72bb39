// SPDX-License-Identifier: Apache-2.0

use marquee_model::{Movie, MovieId, MoviePatch, Review};

use crate::error::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CatalogStats {
    pub movie_count: u64,
    pub review_count: u64,
    /// Mean of the movies' `averageRating` values; zero without movies.
    pub mean_average_rating: f64,
}

pub trait MovieRead {
    /// Newest first; ties fall back to reverse insertion order.
    fn list_movies(&self) -> Result<Vec<Movie>, StoreError>;
    fn get_movie(&self, id: &MovieId) -> Result<Movie, StoreError>;
    fn stats(&self) -> Result<CatalogStats, StoreError>;
}

pub trait MovieWrite {
    fn insert_movie(&self, movie: &Movie) -> Result<(), StoreError>;
    fn update_movie(&self, id: &MovieId, patch: &MoviePatch) -> Result<Movie, StoreError>;
    /// Returns the removed movie, reviews included.
    fn delete_movie(&self, id: &MovieId) -> Result<Movie, StoreError>;
    /// Appends and recomputes `averageRating` in one write.
    fn append_review(&self, id: &MovieId, review: Review) -> Result<Movie, StoreError>;
}

pub trait StoreAdmin {
    fn delete_all(&self) -> Result<u64, StoreError>;
    /// All-or-nothing bulk insert.
    fn insert_many(&self, movies: &[Movie]) -> Result<u64, StoreError>;
    fn ping(&self) -> Result<(), StoreError>;
}

pub trait MovieStore: MovieRead + MovieWrite + StoreAdmin + Send + Sync {}

impl<T: MovieRead + MovieWrite + StoreAdmin + Send + Sync + ?Sized> MovieStore for T {}
