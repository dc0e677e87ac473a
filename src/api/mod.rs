//! Read-only HTTP API over the fundamentals tables.
//!
//! | Method | Path | Returns |
//! |--------|------|---------|
//! | GET | `/health` | service status |
//! | GET | `/fundamental-data-types` | every metric definition |
//! | GET | `/fundamental-data/:ticker` | values for a ticker, filterable by `period`, `year`, `month`, `statement_type`, `name` |
//! | GET | `/tickers` | distinct tickers |
//! | GET | `/ticker/:ticker/availability` | `(year, month)` slots per period |

pub mod error;
pub mod routes;

pub use error::ApiError;

use anyhow::Context;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use log::info;
use sea_orm::DatabaseConnection;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct AppState {
    pub db: Arc<DatabaseConnection>,
}

impl AppState {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route(
            "/fundamental-data-types",
            get(routes::list_fundamental_data_types),
        )
        .route("/fundamental-data/:ticker", get(routes::get_fundamental_data))
        .route("/tickers", get(routes::list_tickers))
        .route(
            "/ticker/:ticker/availability",
            get(routes::get_ticker_availability),
        )
        .layer(timeout_layer(REQUEST_TIMEOUT))
        .with_state(state)
}

/// Requests running past `limit` are answered with 408.
fn timeout_layer(limit: Duration) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, limit)
}

/// Serves the API until Ctrl-C.
pub async fn serve(state: Arc<AppState>, bind: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to bind {}", bind))?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("failed to install Ctrl-C handler: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received.");
}
