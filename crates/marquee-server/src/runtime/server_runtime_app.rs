use crate::config::ApiConfig;
use crate::http::{assets, handlers};
use crate::middleware::cors::cors_middleware;
use crate::middleware::request_tracing::request_tracing_middleware;
use crate::MovieBackend;
use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::Router;
use std::sync::atomic::{AtomicBool, AtomicU64};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn MovieBackend>,
    pub api: ApiConfig,
    pub ready: Arc<AtomicBool>,
    pub(crate) request_id_seed: Arc<AtomicU64>,
}

impl AppState {
    #[must_use]
    pub fn new(backend: Arc<dyn MovieBackend>) -> Self {
        Self::with_config(backend, ApiConfig::default())
    }

    #[must_use]
    pub fn with_config(backend: Arc<dyn MovieBackend>, api: ApiConfig) -> Self {
        Self {
            backend,
            api,
            ready: Arc::new(AtomicBool::new(true)),
            request_id_seed: Arc::new(AtomicU64::new(1)),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(assets::index_handler))
        .route("/index.html", get(assets::index_handler))
        .route("/css/styles.css", get(assets::styles_handler))
        .route("/js/main.js", get(assets::script_handler))
        .route("/healthz", get(handlers::healthz_handler))
        .route("/readyz", get(handlers::readyz_handler))
        .route("/api/openapi.json", get(handlers::openapi_handler))
        .route(
            "/api/movies",
            get(handlers::list_movies_handler).post(handlers::create_movie_handler),
        )
        .route(
            "/api/movies/:id",
            get(handlers::get_movie_handler)
                .put(handlers::update_movie_handler)
                .delete(handlers::delete_movie_handler),
        )
        .route(
            "/api/movies/:id/reviews",
            axum::routing::post(handlers::add_review_handler),
        )
        .layer(from_fn_with_state(state.clone(), cors_middleware))
        .layer(from_fn_with_state(state.clone(), request_tracing_middleware))
        .layer(DefaultBodyLimit::max(state.api.max_body_bytes))
        .with_state(state)
}
