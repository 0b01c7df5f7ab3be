//! # Web Server Crate
//!
//! A thin JSON API over the trade executor. Handlers resolve the caller's identity,
//! parse the request, call exactly one executor operation, and map the result or
//! error onto an HTTP response.
//!
//! ## Public API
//!
//! - `AppState`: the shared state handed to every handler.
//! - `router`: builds the application's routes.
//! - `run_server`: binds a listener and serves until the process is stopped.

use axum::{
    Router,
    routing::{get, post},
};
use executor::TradeExecutor;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod error;
pub mod handlers;

pub use error::AppError;

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub executor: TradeExecutor,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/accounts", post(handlers::open_account))
        .route("/api/portfolio", get(handlers::get_portfolio))
        .route("/api/history", get(handlers::get_history))
        .route("/api/sellable", get(handlers::get_sellable))
        .route("/api/quote/:symbol", get(handlers::get_quote))
        .route("/api/buy", post(handlers::buy))
        .route("/api/sell", post(handlers::sell))
        .with_state(Arc::new(state))
        .layer(CorsLayer::permissive())
        // Logs every incoming request and its response status.
        .layer(TraceLayer::new_for_http())
}

/// The main function to configure and run the web server.
/// Tracing must already be initialised by the caller.
pub async fn run_server(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Web server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
