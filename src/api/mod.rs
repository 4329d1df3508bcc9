pub mod auth;
pub mod error;
pub mod handlers;

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::AuthConfig;
use crate::matching::Matchmaker;
use crate::store::ProfileStore;

#[derive(Clone)]
pub struct AppState {
    pub matchmaker: Arc<Matchmaker>,
    pub store: Arc<dyn ProfileStore>,
    pub auth: Arc<AuthConfig>,
}

impl AppState {
    pub fn new(matchmaker: Matchmaker, store: Arc<dyn ProfileStore>, auth: AuthConfig) -> Self {
        Self {
            matchmaker: Arc::new(matchmaker),
            store,
            auth: Arc::new(auth),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/collaborators", get(handlers::collaborators))
        .route("/search", get(handlers::search))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until Ctrl+C.
pub async fn serve(addr: &str, state: AppState) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("received shutdown signal");
        })
        .await
        .context("http server failed")
}
