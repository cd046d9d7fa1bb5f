use anyhow::{Context, Result};
use chrono::Utc;
use prometheus::{Encoder, GaugeVec, IntCounterVec, Opts, Registry, TextEncoder};

use crate::config::config::ExtractionMode;
use crate::scraping::book_info::BookInfo;

/// Result of one scrape attempt, as published on `kobo_scrape_attempts_total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Found,
    Missing,
    Error,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Found => "found",
            Outcome::Missing => "missing",
            Outcome::Error => "error",
        }
    }
}

/// Metric families of the exporter, registered on a registry owned by this
/// value. Build it once at startup and share it behind an `Arc`.
pub struct ExporterMetrics {
    registry: Registry,
    price: GaugeVec,
    scrapes: IntCounterVec,
    attempts: IntCounterVec,
    last_scrape: GaugeVec,
}

impl ExporterMetrics {
    /// `mode` picks the labels of `kobo_price` and `kobo_scrapes`.
    pub fn new(mode: ExtractionMode) -> Result<Self> {
        let book_labels: &[&str] = match mode {
            ExtractionMode::Full => &["title", "author"],
            ExtractionMode::Price => &["book"],
        };

        let price = GaugeVec::new(
            Opts::new("kobo_price", "Current price of the book."),
            book_labels,
        )?;
        let scrapes = IntCounterVec::new(
            Opts::new("kobo_scrapes", "Number of scrapes for this book."),
            book_labels,
        )?;
        let attempts = IntCounterVec::new(
            Opts::new(
                "kobo_scrape_attempts_total",
                "Number of scrape attempts for this page, by outcome.",
            ),
            &["url", "outcome"],
        )?;
        let last_scrape = GaugeVec::new(
            Opts::new(
                "kobo_last_scrape_timestamp_seconds",
                "Unix time of the last scrape attempt for this page.",
            ),
            &["url"],
        )?;

        let registry = Registry::new();
        registry
            .register(Box::new(price.clone()))
            .context("Failed to register kobo_price")?;
        registry
            .register(Box::new(scrapes.clone()))
            .context("Failed to register kobo_scrapes")?;
        registry
            .register(Box::new(attempts.clone()))
            .context("Failed to register kobo_scrape_attempts_total")?;
        registry
            .register(Box::new(last_scrape.clone()))
            .context("Failed to register kobo_last_scrape_timestamp_seconds")?;

        Ok(ExporterMetrics {
            registry,
            price,
            scrapes,
            attempts,
            last_scrape,
        })
    }

    /// Publishes a price labelled by title and author.
    pub fn record_book(&self, info: &BookInfo) {
        let labels = [info.title.as_str(), info.author.as_str()];
        self.price.with_label_values(&labels).set(info.price);
        self.scrapes.with_label_values(&labels).inc();
    }

    /// Publishes a price labelled by the page it was read from.
    pub fn record_price(&self, book: &str, price: f64) {
        self.price.with_label_values(&[book]).set(price);
        self.scrapes.with_label_values(&[book]).inc();
    }

    pub fn record_attempt(&self, url: &str, outcome: Outcome) {
        self.attempts
            .with_label_values(&[url, outcome.as_str()])
            .inc();
        self.last_scrape
            .with_label_values(&[url])
            .set(Utc::now().timestamp() as f64);
    }

    /// Renders every metric family in the Prometheus text format.
    pub fn encode(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buffer)
            .context("Failed to encode metrics")?;

        String::from_utf8(buffer).context("Metrics are not valid UTF-8")
    }
}
