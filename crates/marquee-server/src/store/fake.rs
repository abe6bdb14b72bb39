use crate::MovieBackend;
use async_trait::async_trait;
use marquee_model::{Movie, MovieId, MoviePatch, Review};
use marquee_store::StoreError;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

/// In-memory backend for router tests. Newest movies sit at the front.
pub struct FakeStore {
    pub movies: Mutex<Vec<Movie>>,
    pub calls: AtomicU64,
    pub unavailable: AtomicBool,
    pub slow_read: Option<Duration>,
}

impl Default for FakeStore {
    fn default() -> Self {
        Self {
            movies: Mutex::new(Vec::new()),
            calls: AtomicU64::new(0),
            unavailable: AtomicBool::new(false),
            slow_read: None,
        }
    }
}

impl FakeStore {
    async fn enter(&self) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if let Some(delay) = self.slow_read {
            tokio::time::sleep(delay).await;
        }
        if self.unavailable.load(Ordering::Relaxed) {
            return Err(StoreError::unavailable("fake store is down"));
        }
        Ok(())
    }

    async fn modify(
        &self,
        id: MovieId,
        f: impl FnOnce(&mut Movie) + Send,
    ) -> Result<Movie, StoreError> {
        self.enter().await?;
        let mut movies = self.movies.lock().await;
        let slot = movies
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| StoreError::not_found(format!("movie {id} not found")))?;
        let mut next = slot.clone();
        f(&mut next);
        next.validate()?;
        *slot = next.clone();
        Ok(next)
    }
}

#[async_trait]
impl MovieBackend for FakeStore {
    fn backend_tag(&self) -> &'static str {
        "fake"
    }

    async fn list_movies(&self) -> Result<Vec<Movie>, StoreError> {
        self.enter().await?;
        let mut movies = self.movies.lock().await.clone();
        // Stable sort keeps newer inserts first among equal timestamps.
        movies.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(movies)
    }

    async fn get_movie(&self, id: MovieId) -> Result<Movie, StoreError> {
        self.enter().await?;
        self.movies
            .lock()
            .await
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(format!("movie {id} not found")))
    }

    async fn insert_movie(&self, movie: Movie) -> Result<Movie, StoreError> {
        self.enter().await?;
        movie.validate()?;
        self.movies.lock().await.insert(0, movie.clone());
        Ok(movie)
    }

    async fn update_movie(&self, id: MovieId, patch: MoviePatch) -> Result<Movie, StoreError> {
        self.modify(id, move |m| m.apply_patch(&patch)).await
    }

    async fn delete_movie(&self, id: MovieId) -> Result<Movie, StoreError> {
        self.enter().await?;
        let mut movies = self.movies.lock().await;
        let idx = movies
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| StoreError::not_found(format!("movie {id} not found")))?;
        Ok(movies.remove(idx))
    }

    async fn append_review(&self, id: MovieId, review: Review) -> Result<Movie, StoreError> {
        self.modify(id, move |m| m.append_review(review)).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.enter().await
    }
}
