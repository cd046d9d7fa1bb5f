use std::sync::Arc;

use chrono::Utc;
use colored::Colorize;
use reqwest::Client;

use crate::config::config::ExtractionMode;
use crate::metrics::exporter_metrics::{ExporterMetrics, Outcome};
use crate::parsing::tokenize::tokenize;
use crate::scraping::find_info::{find_info, find_price};
use crate::utilities::fetch_page::fetch_page;
use crate::utilities::generate_random_delay::generate_random_delay;

/// Everything a scrape needs, shared across the scheduler's iterations.
pub struct ScrapeContext {
    pub client: Client,
    pub metrics: Arc<ExporterMetrics>,
    pub mode: ExtractionMode,
    pub jitter_ms: u64,
}

/// Fetches one book page and publishes what it holds.
///
/// A failed fetch is logged and counted, it never stops the exporter.
pub async fn scrape_book(ctx: &ScrapeContext, url: &str) -> Outcome {
    generate_random_delay(0, ctx.jitter_ms).await;

    let outcome = match fetch_page(&ctx.client, url).await {
        Ok(body) => publish(ctx, url, &body),
        Err(e) => {
            eprintln!(
                "{} {}",
                Utc::now().to_rfc3339(),
                format!("Failed to scrape {}: {:#}", url, e).red()
            );
            Outcome::Error
        }
    };

    ctx.metrics.record_attempt(url, outcome);
    outcome
}

fn publish(ctx: &ScrapeContext, url: &str, body: &[u8]) -> Outcome {
    let timestamp = Utc::now().to_rfc3339();
    let metrics = &ctx.metrics;

    let found = match ctx.mode {
        ExtractionMode::Full => find_info(tokenize(body)).map(|info| {
            println!(
                "{} {}",
                timestamp,
                format!("{} by {}: {}", info.title, info.author, info.price).green()
            );
            metrics.record_book(&info);
        }),
        ExtractionMode::Price => find_price(tokenize(body)).map(|price| {
            println!("{} {}", timestamp, format!("{}: {}", url, price).green());
            metrics.record_price(url, price);
        }),
    };

    match found {
        Some(()) => Outcome::Found,
        None => {
            println!(
                "{} {}",
                timestamp,
                format!("No price found on {}", url).yellow()
            );
            Outcome::Missing
        }
    }
}
