//! HTTP request boundary
//!
//! Decodes requests, dispatches to the transfer engine and the read
//! projections, and maps the error taxonomy to status codes. No business
//! rule lives here.

pub mod handlers;
pub mod state;
pub mod types;

use anyhow::{Context, Result};
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::clock::SystemClock;
use crate::config::GatewayConfig;
use crate::db::Database;
use crate::ledger::store::LedgerStore;
use crate::transfer::engine::TransferEngine;
use state::AppState;

/// Build the application router over shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/transaction", post(handlers::post_transaction))
        .route("/balance/{user_id}", get(handlers::get_balance))
        .route(
            "/transaction-history/{user_id}",
            get(handlers::get_transaction_history),
        )
        .route("/health", get(handlers::health))
        .with_state(state)
}

/// Bind the listening socket and serve until shutdown.
pub async fn run_server(config: &GatewayConfig, db: Database) -> Result<()> {
    let store = LedgerStore::new(db.pool().clone());
    let engine = TransferEngine::new(store.clone(), Arc::new(SystemClock));
    let state = Arc::new(AppState::new(db, store, engine));

    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!("Gateway listening on {addr}");
    axum::serve(listener, app)
        .await
        .context("Gateway server terminated abnormally")?;

    Ok(())
}
