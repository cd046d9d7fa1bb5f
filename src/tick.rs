use std::sync::Arc;

use chrono::Utc;
use colored::Colorize;
use tokio::time::{interval, Duration, MissedTickBehavior};

use crate::scrape_book::{scrape_book, ScrapeContext};

pub fn next_index(i: usize, len: usize) -> usize {
    (i + 1) % len
}

/// Scrapes one page per period, cycling through `urls`. The first page is
/// scraped right away.
pub async fn tick(ctx: Arc<ScrapeContext>, frequency: Duration, urls: Vec<String>) {
    if urls.is_empty() {
        return;
    }

    println!(
        "{} {}",
        Utc::now().to_rfc3339(),
        format!(
            "Scraping {} page(s), one every {} seconds",
            urls.len(),
            frequency.as_secs()
        )
        .green()
    );

    let mut ticker = interval(frequency);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut i = 0;

    loop {
        ticker.tick().await;
        scrape_book(&ctx, &urls[i]).await;
        i = next_index(i, urls.len());
    }
}
