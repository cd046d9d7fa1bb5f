use std::time::Duration;

use anyhow::{bail, Context, Result};
use bytes::Bytes;
use reqwest::Client;

use crate::config::config::ExporterConfig;

/// Builds the HTTP client shared by every scrape.
pub fn build_client(config: &ExporterConfig) -> Result<Client> {
    let mut builder = Client::builder().timeout(Duration::from_secs(config.timeout));

    if let Some(user_agent) = &config.user_agent {
        builder = builder.user_agent(user_agent);
    }

    builder.build().context("Failed to build HTTP client")
}

/// Downloads a book page. Any non-2xx status is an error.
pub async fn fetch_page(client: &Client, url: &str) -> Result<Bytes> {
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to send request to {}", url))?;

    let status = response.status();
    if !status.is_success() {
        bail!("Failed to fetch {}: Status: {}", url, status);
    }

    response
        .bytes()
        .await
        .context("Failed to read response body")
}
