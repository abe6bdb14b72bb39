// SPDX-License-Identifier: Apache-2.0

use crate::MovieBackend;
use async_trait::async_trait;
use marquee_model::{Movie, MovieId, MoviePatch, Review};
use marquee_store::{MovieStore, StoreError, StoreErrorCode};
use std::sync::Arc;

/// Runs a synchronous [`MovieStore`] on the blocking thread pool.
#[derive(Clone)]
pub struct BlockingStoreBackend {
    store: Arc<dyn MovieStore>,
}

impl BlockingStoreBackend {
    #[must_use]
    pub fn new(store: Arc<dyn MovieStore>) -> Self {
        Self { store }
    }

    async fn run<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&dyn MovieStore) -> Result<T, StoreError> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || op(store.as_ref()))
            .await
            .map_err(|e| StoreError::new(StoreErrorCode::Internal, format!("store task: {e}")))?
    }
}

#[async_trait]
impl MovieBackend for BlockingStoreBackend {
    fn backend_tag(&self) -> &'static str {
        "sqlite"
    }

    async fn list_movies(&self) -> Result<Vec<Movie>, StoreError> {
        self.run(|s| s.list_movies()).await
    }

    async fn get_movie(&self, id: MovieId) -> Result<Movie, StoreError> {
        self.run(move |s| s.get_movie(&id)).await
    }

    async fn insert_movie(&self, movie: Movie) -> Result<Movie, StoreError> {
        self.run(move |s| s.insert_movie(&movie).map(|()| movie))
            .await
    }

    async fn update_movie(&self, id: MovieId, patch: MoviePatch) -> Result<Movie, StoreError> {
        self.run(move |s| s.update_movie(&id, &patch)).await
    }

    async fn delete_movie(&self, id: MovieId) -> Result<Movie, StoreError> {
        self.run(move |s| s.delete_movie(&id)).await
    }

    async fn append_review(&self, id: MovieId, review: Review) -> Result<Movie, StoreError> {
        self.run(move |s| s.append_review(&id, review)).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.run(|s| s.ping()).await
    }
}
