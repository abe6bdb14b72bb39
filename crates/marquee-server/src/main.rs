#![forbid(unsafe_code)]

use marquee_server::{
    build_router, validate_startup_config, ApiConfig, AppState, BlockingStoreBackend,
};
use marquee_store::{SqliteMovieStore, StoreLocation};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = sigint.recv() => {}
                }
            }
            _ => {
                error!("signal handlers unavailable; falling back to ctrl-c");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

fn init_tracing(log_json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let api_cfg = ApiConfig::from_env();
    init_tracing(api_cfg.log_json);
    validate_startup_config(&api_cfg)?;

    let location = StoreLocation::parse(&api_cfg.store_url).map_err(|e| e.to_string())?;
    let store = Arc::new(SqliteMovieStore::open(&location).map_err(|e| {
        error!(store = %location, "store open failed: {e}");
        format!("open store {location}: {e}")
    })?);
    let backend = Arc::new(BlockingStoreBackend::new(store.clone()));

    let bind_addr = api_cfg.bind_addr.clone();
    let drain = api_cfg.shutdown_drain;
    let state = AppState::with_config(backend, api_cfg);
    let app = build_router(state.clone());

    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| format!("bind {bind_addr} failed: {e}"))?;
    info!(store = %location, "marquee-server listening on {bind_addr}");

    let ready = state.ready.clone();
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            wait_for_shutdown_signal().await;
            info!("shutdown signal received");
            ready.store(false, Ordering::Relaxed);
            if !drain.is_zero() {
                tokio::time::sleep(drain).await;
            }
        })
        .await
        .map_err(|e| format!("server failed: {e}"));

    if let Err(e) = store.close() {
        error!("store close failed: {e}");
    }
    info!("marquee-server stopped");
    served
}
