use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tokio::time::Duration;

use crate::config::cli::Cli;
use crate::metrics::exporter_metrics::ExporterMetrics;
use crate::scrape_book::ScrapeContext;
use crate::server::serve_metrics::{serve_metrics, AppState};
use crate::utilities::fetch_page::build_client;

// Import modules
mod config;
mod metrics;
mod parsing;
mod scrape_book;
mod scraping;
mod server;
mod tick;
mod utilities;
#[cfg(test)]
mod test_utils;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration settings
    let config = match config::config::load_config(&cli) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{}", format!("Failed to load configuration: {:#}", e).red());
            return Err(e);
        }
    };
    let urls = config.resolve_urls(&cli.urls)?;

    // Metrics live on their own registry, shared by the scheduler and the server
    let metrics = Arc::new(ExporterMetrics::new(config.exporter.mode)?);

    let ctx = Arc::new(ScrapeContext {
        client: build_client(&config.exporter)?,
        metrics: metrics.clone(),
        mode: config.exporter.mode,
        jitter_ms: config.exporter.jitter_ms,
    });

    let state = AppState {
        metrics,
        mode: config.exporter.mode,
        page_count: urls.len(),
    };

    tokio::spawn(tick::tick(
        ctx,
        Duration::from_secs(config.exporter.frequency),
        urls,
    ));

    serve_metrics(config.exporter.port, state).await
}
