// SPDX-License-Identifier: Apache-2.0

use marquee_model::{Movie, MovieId, MoviePatch, Review};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::fs;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, info};

use crate::contracts::{CatalogStats, MovieRead, MovieWrite, StoreAdmin};
use crate::error::{StoreError, StoreErrorCode};
use crate::location::StoreLocation;
use crate::schema::{MOVIES_SCHEMA_SQL, SCHEMA_VERSION};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-backed movie document store.
///
/// The handle owns a single connection. `close` releases it; every call made
/// afterwards fails with `Unavailable`.
pub struct SqliteMovieStore {
    location: StoreLocation,
    conn: Mutex<Option<Connection>>,
}

impl SqliteMovieStore {
    pub fn open(location: &StoreLocation) -> Result<Self, StoreError> {
        let conn = match location {
            StoreLocation::Memory => Connection::open_in_memory(),
            StoreLocation::File(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent).map_err(|e| {
                        StoreError::new(
                            StoreErrorCode::Io,
                            format!("create store directory {}: {e}", parent.display()),
                        )
                    })?;
                }
                Connection::open(path)
            }
        }
        .map_err(|e| StoreError::unavailable(format!("open {location}: {e}")))?;

        conn.busy_timeout(BUSY_TIMEOUT)?;
        if matches!(location, StoreLocation::File(_)) {
            let mode: String =
                conn.pragma_update_and_check(None, "journal_mode", "WAL", |r| r.get(0))?;
            conn.pragma_update(None, "synchronous", "NORMAL")?;
            debug!(store = %location, journal_mode = %mode, "store pragmas applied");
        }
        migrate(&conn)?;
        info!(store = %location, "movie store opened");
        Ok(Self {
            location: location.clone(),
            conn: Mutex::new(Some(conn)),
        })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::open(&StoreLocation::Memory)
    }

    #[must_use]
    pub fn location(&self) -> &StoreLocation {
        &self.location
    }

    /// Idempotent.
    pub fn close(&self) -> Result<(), StoreError> {
        let mut guard = self.lock()?;
        if let Some(conn) = guard.take() {
            conn.close().map_err(|(_, e)| StoreError::from(e))?;
            info!(store = %self.location, "movie store closed");
        }
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<Connection>>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::new(StoreErrorCode::Internal, "store connection lock poisoned"))
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&mut Connection) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut guard = self.lock()?;
        let conn = guard
            .as_mut()
            .ok_or_else(|| StoreError::unavailable("movie store is closed"))?;
        f(conn)
    }

    /// Read-modify-write under an immediate transaction so concurrent
    /// writers to the same file serialize instead of losing updates.
    fn modify(&self, id: &MovieId, f: impl FnOnce(&mut Movie)) -> Result<Movie, StoreError> {
        self.with_conn(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let mut movie = load(&tx, id)?;
            f(&mut movie);
            movie.validate()?;
            let document = serde_json::to_string(&movie)?;
            tx.execute(
                "UPDATE movies SET document = ?1 WHERE id = ?2",
                params![document, id.to_string()],
            )?;
            tx.commit()?;
            Ok(movie)
        })
    }
}

fn migrate(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(MOVIES_SCHEMA_SQL)?;
    let version: i64 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
    if version > SCHEMA_VERSION {
        return Err(StoreError::new(
            StoreErrorCode::Unsupported,
            format!("store schema version {version} is newer than supported {SCHEMA_VERSION}"),
        ));
    }
    if version < SCHEMA_VERSION {
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        debug!(from = version, to = SCHEMA_VERSION, "store schema migrated");
    }
    Ok(())
}

fn load(conn: &Connection, id: &MovieId) -> Result<Movie, StoreError> {
    let document: Option<String> = conn
        .query_row(
            "SELECT document FROM movies WHERE id = ?1",
            params![id.to_string()],
            |r| r.get(0),
        )
        .optional()?;
    let document = document.ok_or_else(|| StoreError::not_found(format!("movie {id} not found")))?;
    Ok(serde_json::from_str(&document)?)
}

fn insert(conn: &Connection, movie: &Movie) -> Result<(), StoreError> {
    movie.validate()?;
    let document = serde_json::to_string(movie)?;
    conn.execute(
        "INSERT INTO movies (id, created_at_ms, document) VALUES (?1, ?2, ?3)",
        params![
            movie.id.to_string(),
            movie.created_at.timestamp_millis(),
            document
        ],
    )?;
    Ok(())
}

impl MovieRead for SqliteMovieStore {
    fn list_movies(&self) -> Result<Vec<Movie>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare_cached(
                "SELECT document FROM movies ORDER BY created_at_ms DESC, seq DESC",
            )?;
            let rows = stmt.query_map([], |r| r.get::<_, String>(0))?;
            let mut out = Vec::new();
            for row in rows {
                out.push(serde_json::from_str(&row?)?);
            }
            Ok(out)
        })
    }

    fn get_movie(&self, id: &MovieId) -> Result<Movie, StoreError> {
        self.with_conn(|conn| load(conn, id))
    }

    fn stats(&self) -> Result<CatalogStats, StoreError> {
        self.with_conn(|conn| {
            let (movies, reviews, mean): (i64, i64, f64) = conn.query_row(
                "SELECT COUNT(*),
                        COALESCE(SUM(json_array_length(document, '$.reviews')), 0),
                        COALESCE(AVG(json_extract(document, '$.averageRating')), 0.0)
                 FROM movies",
                [],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )?;
            Ok(CatalogStats {
                movie_count: u64::try_from(movies).unwrap_or(0),
                review_count: u64::try_from(reviews).unwrap_or(0),
                mean_average_rating: mean,
            })
        })
    }
}

impl MovieWrite for SqliteMovieStore {
    fn insert_movie(&self, movie: &Movie) -> Result<(), StoreError> {
        self.with_conn(|conn| insert(conn, movie))
    }

    fn update_movie(&self, id: &MovieId, patch: &MoviePatch) -> Result<Movie, StoreError> {
        self.modify(id, |movie| movie.apply_patch(patch))
    }

    fn delete_movie(&self, id: &MovieId) -> Result<Movie, StoreError> {
        self.with_conn(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let movie = load(&tx, id)?;
            tx.execute("DELETE FROM movies WHERE id = ?1", params![id.to_string()])?;
            tx.commit()?;
            Ok(movie)
        })
    }

    fn append_review(&self, id: &MovieId, review: Review) -> Result<Movie, StoreError> {
        self.modify(id, move |movie| movie.append_review(review))
    }
}

impl StoreAdmin for SqliteMovieStore {
    fn delete_all(&self) -> Result<u64, StoreError> {
        self.with_conn(|conn| {
            let removed = conn.execute("DELETE FROM movies", [])?;
            Ok(removed as u64)
        })
    }

    fn insert_many(&self, movies: &[Movie]) -> Result<u64, StoreError> {
        self.with_conn(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            for movie in movies {
                insert(&tx, movie)?;
            }
            tx.commit()?;
            Ok(movies.len() as u64)
        })
    }

    fn ping(&self) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            conn.query_row("SELECT 1", [], |r| r.get::<_, i64>(0))?;
            Ok(())
        })
    }
}

impl Drop for SqliteMovieStore {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
