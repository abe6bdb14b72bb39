mod support;

use marquee_model::{Movie, MovieId, MoviePatch, Review};
use marquee_server::{ApiConfig, BlockingStoreBackend};
use marquee_store::{CatalogStats, MovieRead, MovieWrite, SqliteMovieStore, StoreAdmin, StoreError};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use support::{send_json, send_raw_with_method, spawn_app, sqlite_backend};

const MOVIE_X: &str = r#"{"title":"X","year":2020,"genre":"Drama","description":"d"}"#;

async fn create(addr: std::net::SocketAddr, body: &str) -> Value {
    let (status, movie) = send_json(addr, "POST", "/api/movies", Some(body)).await;
    assert_eq!(status, 201, "{movie}");
    movie
}

#[tokio::test]
async fn create_then_review_recomputes_the_mean() {
    let (addr, _) = spawn_app(sqlite_backend(), ApiConfig::default()).await;

    let movie = create(addr, MOVIE_X).await;
    assert_eq!(movie["averageRating"], 0.0);
    assert_eq!(movie["reviews"], Value::Array(Vec::new()));
    assert!(movie.get("director").is_none());
    let id = movie["_id"].as_str().expect("_id").to_string();
    let reviews = format!("/api/movies/{id}/reviews");

    let (status, after) = send_json(
        addr,
        "POST",
        &reviews,
        Some(r#"{"username":"u","rating":4,"comment":"c"}"#),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(after["averageRating"], 4.0);

    let (status, after) = send_json(
        addr,
        "POST",
        &reviews,
        Some(r#"{"username":"v","rating":2,"comment":"meh"}"#),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(after["averageRating"], 3.0);
    let names: Vec<&str> = after["reviews"]
        .as_array()
        .expect("reviews")
        .iter()
        .filter_map(|r| r["username"].as_str())
        .collect();
    assert_eq!(names, vec!["u", "v"]);
    assert!(after["reviews"][0]["createdAt"].is_string());

    let (status, fetched) = send_json(addr, "GET", &format!("/api/movies/{id}"), None).await;
    assert_eq!(status, 200);
    assert_eq!(fetched, after);
}

#[tokio::test]
async fn list_returns_newest_first() {
    let (addr, _) = spawn_app(sqlite_backend(), ApiConfig::default()).await;
    create(addr, r#"{"title":"A","year":2001,"genre":"g","description":"d"}"#).await;
    create(addr, r#"{"title":"B","year":2002,"genre":"g","description":"d"}"#).await;

    let (status, list) = send_json(addr, "GET", "/api/movies", None).await;
    assert_eq!(status, 200);
    let titles: Vec<&str> = list
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|m| m["title"].as_str())
        .collect();
    assert_eq!(titles, vec!["B", "A"]);
}

#[tokio::test]
async fn invalid_review_leaves_the_movie_untouched() {
    let (addr, _) = spawn_app(sqlite_backend(), ApiConfig::default()).await;
    let id = create(addr, MOVIE_X).await["_id"]
        .as_str()
        .expect("_id")
        .to_string();
    let reviews = format!("/api/movies/{id}/reviews");

    for body in [
        r#"{"username":"u","rating":9,"comment":"c"}"#,
        r#"{"username":"u","rating":0,"comment":"c"}"#,
        r#"{"username":" ","rating":3,"comment":"c"}"#,
        r#"{"username":"u","rating":3}"#,
    ] {
        let (status, err) = send_json(addr, "POST", &reviews, Some(body)).await;
        assert_eq!(status, 400, "{body}");
        assert_eq!(err["code"], "ValidationFailed");
        assert!(err["message"].is_string());
    }

    let (_, movie) = send_json(addr, "GET", &format!("/api/movies/{id}"), None).await;
    assert_eq!(movie["reviews"], Value::Array(Vec::new()));
    assert_eq!(movie["averageRating"], 0.0);
}

#[tokio::test]
async fn create_reports_every_missing_field() {
    let (addr, _) = spawn_app(sqlite_backend(), ApiConfig::default()).await;
    let (status, err) = send_json(addr, "POST", "/api/movies", Some(r#"{"title":"  "}"#)).await;
    assert_eq!(status, 400);
    let fields: Vec<&str> = err["details"]["field_errors"]
        .as_array()
        .expect("field_errors")
        .iter()
        .filter_map(|e| e["field"].as_str())
        .collect();
    assert_eq!(fields, vec!["title", "year", "genre", "description"]);

    let (_, list) = send_json(addr, "GET", "/api/movies", None).await;
    assert_eq!(list, Value::Array(Vec::new()));
}

#[tokio::test]
async fn update_replaces_fields_and_revalidates() {
    let (addr, _) = spawn_app(sqlite_backend(), ApiConfig::default()).await;
    let id = create(addr, MOVIE_X).await["_id"]
        .as_str()
        .expect("_id")
        .to_string();
    let path = format!("/api/movies/{id}");

    let (status, updated) = send_json(
        addr,
        "PUT",
        &path,
        Some(r#"{"title":"Y","director":"Someone","averageRating":5}"#),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(updated["title"], "Y");
    assert_eq!(updated["year"], 2020);
    assert_eq!(updated["director"], "Someone");
    assert_eq!(updated["averageRating"], 0.0);

    let (status, err) = send_json(addr, "PUT", &path, Some(r#"{"genre":""}"#)).await;
    assert_eq!(status, 400);
    assert_eq!(err["details"]["field_errors"][0]["field"], "genre");

    let missing = format!("/api/movies/{}", marquee_model::MovieId::generate());
    let (status, err) = send_json(addr, "PUT", &missing, Some(r#"{"title":"Z"}"#)).await;
    assert_eq!(status, 404);
    assert_eq!(err["message"], "Movie not found");
}

#[tokio::test]
async fn update_with_null_required_field_is_rejected() {
    let (addr, _) = spawn_app(sqlite_backend(), ApiConfig::default()).await;
    let id = create(addr, MOVIE_X).await["_id"]
        .as_str()
        .expect("_id")
        .to_string();
    let path = format!("/api/movies/{id}");

    for (body, field) in [
        (r#"{"title":null}"#, "title"),
        (r#"{"year":null}"#, "year"),
        (r#"{"description":null}"#, "description"),
    ] {
        let (status, err) = send_json(addr, "PUT", &path, Some(body)).await;
        assert_eq!(status, 400, "{body}");
        assert_eq!(err["code"], "ValidationFailed");
        assert_eq!(err["details"]["field_errors"][0]["field"], field);
    }

    let (status, movie) = send_json(addr, "GET", &path, None).await;
    assert_eq!(status, 200);
    assert_eq!(movie["title"], "X");
    assert_eq!(movie["year"], 2020);
    assert_eq!(movie["description"], "d");
}

/// Delegates to SQLite but holds each review append past the request timeout.
struct SlowAppendStore {
    inner: SqliteMovieStore,
    delay: Duration,
}

impl MovieRead for SlowAppendStore {
    fn list_movies(&self) -> Result<Vec<Movie>, StoreError> {
        self.inner.list_movies()
    }
    fn get_movie(&self, id: &MovieId) -> Result<Movie, StoreError> {
        self.inner.get_movie(id)
    }
    fn stats(&self) -> Result<CatalogStats, StoreError> {
        self.inner.stats()
    }
}

impl MovieWrite for SlowAppendStore {
    fn insert_movie(&self, movie: &Movie) -> Result<(), StoreError> {
        self.inner.insert_movie(movie)
    }
    fn update_movie(&self, id: &MovieId, patch: &MoviePatch) -> Result<Movie, StoreError> {
        self.inner.update_movie(id, patch)
    }
    fn delete_movie(&self, id: &MovieId) -> Result<Movie, StoreError> {
        self.inner.delete_movie(id)
    }
    fn append_review(&self, id: &MovieId, review: Review) -> Result<Movie, StoreError> {
        std::thread::sleep(self.delay);
        self.inner.append_review(id, review)
    }
}

impl StoreAdmin for SlowAppendStore {
    fn delete_all(&self) -> Result<u64, StoreError> {
        self.inner.delete_all()
    }
    fn insert_many(&self, movies: &[Movie]) -> Result<u64, StoreError> {
        self.inner.insert_many(movies)
    }
    fn ping(&self) -> Result<(), StoreError> {
        self.inner.ping()
    }
}

#[tokio::test]
async fn slow_review_append_reports_what_was_committed() {
    let store = SlowAppendStore {
        inner: SqliteMovieStore::open_in_memory().expect("store"),
        delay: Duration::from_millis(300),
    };
    let backend = Arc::new(BlockingStoreBackend::new(Arc::new(store)));
    let api = ApiConfig {
        request_timeout: Duration::from_millis(100),
        ..ApiConfig::default()
    };
    let (addr, _) = spawn_app(backend, api).await;
    let id = create(addr, MOVIE_X).await["_id"]
        .as_str()
        .expect("_id")
        .to_string();

    let (status, after) = send_json(
        addr,
        "POST",
        &format!("/api/movies/{id}/reviews"),
        Some(r#"{"username":"u","rating":4,"comment":"c"}"#),
    )
    .await;
    assert_eq!(status, 200, "{after}");
    assert_eq!(after["averageRating"], 4.0);
    assert_eq!(after["reviews"].as_array().map(Vec::len), Some(1));

    let (status, fetched) = send_json(addr, "GET", &format!("/api/movies/{id}"), None).await;
    assert_eq!(status, 200);
    assert_eq!(fetched["reviews"].as_array().map(Vec::len), Some(1));
    assert_eq!(fetched["averageRating"], 4.0);
}

#[tokio::test]
async fn delete_then_get_is_not_found() {
    let (addr, _) = spawn_app(sqlite_backend(), ApiConfig::default()).await;
    let id = create(addr, MOVIE_X).await["_id"]
        .as_str()
        .expect("_id")
        .to_string();
    let path = format!("/api/movies/{id}");

    let (status, body) = send_json(addr, "DELETE", &path, None).await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], "Movie deleted successfully");

    let (status, body) = send_json(addr, "GET", &path, None).await;
    assert_eq!(status, 404);
    assert_eq!(body["message"], "Movie not found");
    assert_eq!(body["code"], "MovieNotFound");

    let (status, _) = send_json(addr, "DELETE", &path, None).await;
    assert_eq!(status, 404);
    let (status, _) = send_json(
        addr,
        "POST",
        &format!("{path}/reviews"),
        Some(r#"{"username":"u","rating":3,"comment":"c"}"#),
    )
    .await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn malformed_ids_follow_per_route_statuses() {
    let (addr, _) = spawn_app(sqlite_backend(), ApiConfig::default()).await;
    let (status, body) = send_json(addr, "GET", "/api/movies/not-an-id", None).await;
    assert_eq!(status, 500);
    assert!(body["message"].as_str().is_some_and(|m| m.contains("not-an-id")));

    let (status, _) = send_json(addr, "DELETE", "/api/movies/not-an-id", None).await;
    assert_eq!(status, 500);

    let (status, body) =
        send_json(addr, "PUT", "/api/movies/not-an-id", Some(r#"{"title":"T"}"#)).await;
    assert_eq!(status, 400);
    assert_eq!(body["code"], "MalformedId");

    let (status, _) = send_json(
        addr,
        "POST",
        "/api/movies/not-an-id/reviews",
        Some(r#"{"username":"u","rating":3,"comment":"c"}"#),
    )
    .await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn malformed_and_oversized_bodies_use_the_error_shape() {
    let api = ApiConfig {
        max_body_bytes: 256,
        ..ApiConfig::default()
    };
    let (addr, _) = spawn_app(sqlite_backend(), api).await;

    let (status, body) = send_json(addr, "POST", "/api/movies", Some("{not json")).await;
    assert_eq!(status, 400);
    assert_eq!(body["code"], "InvalidBody");

    let (status, body) = send_json(addr, "POST", "/api/movies", Some("[1,2,3]")).await;
    assert_eq!(status, 400);
    assert_eq!(body["code"], "InvalidBody");

    let big = format!(
        r#"{{"title":"X","year":2020,"genre":"Drama","description":"{}"}}"#,
        "d".repeat(1024)
    );
    let (status, _, raw) = send_raw_with_method(addr, "POST", "/api/movies", &[], Some(&big)).await;
    assert_eq!(status, 413);
    let body: Value = serde_json::from_str(&raw).expect("json error body");
    assert_eq!(body["code"], "InvalidBody");
}

#[tokio::test]
async fn closed_file_store_is_a_server_error() {
    use marquee_server::BlockingStoreBackend;
    use marquee_store::{SqliteMovieStore, StoreLocation};
    use std::sync::Arc;

    let dir = tempfile::tempdir().expect("tempdir");
    let location = StoreLocation::File(dir.path().join("movies.sqlite"));
    let store = Arc::new(SqliteMovieStore::open(&location).expect("open file store"));
    let backend = Arc::new(BlockingStoreBackend::new(store.clone()));
    let (addr, _) = spawn_app(backend, ApiConfig::default()).await;

    create(addr, MOVIE_X).await;
    store.close().expect("close store");

    let (status, err) = send_json(addr, "GET", "/api/movies", None).await;
    assert_eq!(status, 500);
    assert_eq!(err["code"], "StoreUnavailable");
    let (status, _, _) = support::send_raw(addr, "/readyz", &[]).await;
    assert_eq!(status, 503);
}
