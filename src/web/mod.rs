//! Minimal web surface: a static page and a JSON endpoint for today's forecast.

pub mod handlers;

use crate::daily_forecast::DailyForecast;
use axum::{routing::get, Router};
use log::{info, warn};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub forecast: Arc<DailyForecast>,
}

impl AppState {
    pub fn new(forecast: DailyForecast) -> Self {
        Self {
            forecast: Arc::new(forecast),
        }
    }
}

/// Create the router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/weather", get(handlers::current_weather))
        .with_state(state)
}

/// Serves the router on `address` until Ctrl-C is received.
pub async fn serve(address: &str, state: AppState) -> std::io::Result<()> {
    let listener = TcpListener::bind(address).await?;
    info!("Serving forecast on http://{}", listener.local_addr()?);
    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received, stopping server"),
        Err(e) => {
            warn!("Can't listen for Ctrl-C, serving until killed: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
