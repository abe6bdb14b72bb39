// SPDX-License-Identifier: Apache-2.0

use super::response_contract::{api_error_from_store, api_error_response, respond};
use crate::AppState;
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use marquee_api::{
    openapi_v1_spec, parse_movie_id, parse_movie_patch, parse_new_movie, parse_new_review,
    ApiError, MOVIE_DELETED_MESSAGE,
};
use marquee_model::{Movie, MovieId, Review};
use marquee_store::StoreError;
use serde_json::{json, Value};
use std::future::Future;
use std::sync::atomic::Ordering;
use tokio::time::timeout;
use tracing::{info, warn};

/// Bounds one backend read by the request timeout.
async fn call_store<T>(
    state: &AppState,
    operation: &'static str,
    work: impl Future<Output = Result<T, StoreError>>,
) -> Result<T, ApiError> {
    match timeout(state.api.request_timeout, work).await {
        Ok(result) => result.map_err(api_error_from_store),
        Err(_) => {
            let timeout_ms = u64::try_from(state.api.request_timeout.as_millis()).unwrap_or(u64::MAX);
            Err(ApiError::timeout(operation, timeout_ms))
        }
    }
}

/// Awaits a backend write to completion. The blocking task commits whether
/// or not the caller is still waiting, so writes carry no request timeout.
async fn commit_store<T>(
    operation: &'static str,
    work: impl Future<Output = Result<T, StoreError>>,
) -> Result<T, ApiError> {
    work.await.map_err(|e| {
        warn!(operation, "store write failed: {e}");
        api_error_from_store(e)
    })
}

fn parse_json_body(body: Result<Bytes, BytesRejection>) -> Result<Value, (StatusCode, ApiError)> {
    let bytes = body.map_err(|rejection| {
        (
            rejection.status(),
            ApiError::invalid_body(rejection.body_text()),
        )
    })?;
    serde_json::from_slice(&bytes)
        .map_err(|e| (StatusCode::BAD_REQUEST, ApiError::invalid_body(e.to_string())))
}

pub(crate) async fn list_movies_handler(State(state): State<AppState>) -> Response {
    let result = call_store(&state, "list movies", state.backend.list_movies()).await;
    respond(result, StatusCode::OK)
}

pub(crate) async fn get_movie_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Response {
    respond(get_movie(&state, &raw_id).await, StatusCode::OK)
}

async fn get_movie(state: &AppState, raw_id: &str) -> Result<Movie, ApiError> {
    let id = parse_movie_id(raw_id).map_err(ApiError::into_internal)?;
    call_store(state, "get movie", state.backend.get_movie(id)).await
}

pub(crate) async fn create_movie_handler(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    match parse_json_body(body) {
        Ok(value) => respond(create_movie(&state, &value).await, StatusCode::CREATED),
        Err((status, err)) => api_error_response(status, err),
    }
}

async fn create_movie(state: &AppState, body: &Value) -> Result<Movie, ApiError> {
    let input = parse_new_movie(body)?;
    let movie = Movie::create(MovieId::generate(), input, Utc::now());
    let created = commit_store("create movie", state.backend.insert_movie(movie)).await?;
    info!(movie_id = %created.id, "movie created");
    Ok(created)
}

pub(crate) async fn update_movie_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    match parse_json_body(body) {
        Ok(value) => respond(update_movie(&state, &raw_id, &value).await, StatusCode::OK),
        Err((status, err)) => api_error_response(status, err),
    }
}

async fn update_movie(state: &AppState, raw_id: &str, body: &Value) -> Result<Movie, ApiError> {
    let id = parse_movie_id(raw_id)?;
    let patch = parse_movie_patch(body)?;
    commit_store("update movie", state.backend.update_movie(id, patch)).await
}

pub(crate) async fn delete_movie_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Response {
    respond(delete_movie(&state, &raw_id).await, StatusCode::OK)
}

async fn delete_movie(state: &AppState, raw_id: &str) -> Result<Value, ApiError> {
    let id = parse_movie_id(raw_id).map_err(ApiError::into_internal)?;
    let removed = commit_store("delete movie", state.backend.delete_movie(id)).await?;
    info!(movie_id = %removed.id, reviews = removed.reviews.len(), "movie deleted");
    Ok(json!({ "message": MOVIE_DELETED_MESSAGE }))
}

pub(crate) async fn add_review_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    match parse_json_body(body) {
        Ok(value) => respond(add_review(&state, &raw_id, &value).await, StatusCode::OK),
        Err((status, err)) => api_error_response(status, err),
    }
}

async fn add_review(state: &AppState, raw_id: &str, body: &Value) -> Result<Movie, ApiError> {
    let id = parse_movie_id(raw_id)?;
    let review = Review::from_input(parse_new_review(body)?, Utc::now());
    let movie = commit_store("add review", state.backend.append_review(id, review)).await?;
    info!(
        movie_id = %movie.id,
        reviews = movie.reviews.len(),
        average_rating = movie.average_rating,
        "review added"
    );
    Ok(movie)
}

pub(crate) async fn healthz_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub(crate) async fn readyz_handler(State(state): State<AppState>) -> impl IntoResponse {
    if !state.ready.load(Ordering::Relaxed) {
        return (StatusCode::SERVICE_UNAVAILABLE, "not-ready");
    }
    match call_store(&state, "ping", state.backend.ping()).await {
        Ok(()) => (StatusCode::OK, "ready"),
        Err(err) => {
            warn!(backend = state.backend.backend_tag(), "readiness check failed: {err}");
            (StatusCode::SERVICE_UNAVAILABLE, "not-ready")
        }
    }
}

pub(crate) async fn openapi_handler() -> impl IntoResponse {
    Json(openapi_v1_spec())
}
