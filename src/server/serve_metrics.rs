use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use colored::Colorize;
use tokio::net::TcpListener;

use crate::config::config::ExtractionMode;
use crate::metrics::exporter_metrics::ExporterMetrics;
use crate::server::landing_page::landing_page;

#[derive(Clone)]
pub struct AppState {
    pub metrics: Arc<ExporterMetrics>,
    pub mode: ExtractionMode,
    pub page_count: usize,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(landing_page))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

pub async fn metrics_handler(State(state): State<AppState>) -> Response {
    match state.metrics.encode() {
        Ok(body) => ([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}", e)).into_response(),
    }
}

/// Serves the landing page and `/metrics` until the listener fails.
pub async fn serve_metrics(port: u16, state: AppState) -> Result<()> {
    let listener = TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("Failed to bind metrics server on port {}", port))?;

    println!(
        "{}",
        format!("Serving metrics on http://0.0.0.0:{}/metrics", port).green()
    );

    axum::serve(listener, router(state))
        .await
        .context("Metrics server stopped")
}
