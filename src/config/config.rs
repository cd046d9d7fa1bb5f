use ::config::{Config, Environment, File, FileFormat};
use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use serde::Deserialize;

use crate::config::cli::Cli;
use crate::config::read_url_list::read_url_list;

/// Which fields are published for a page.
#[derive(Deserialize, ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMode {
    /// Title, author and price, labelled by title and author
    Full,
    /// Price only, labelled by page URL
    Price,
}

impl ExtractionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMode::Full => "full",
            ExtractionMode::Price => "price",
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct AppConfig {
    pub exporter: ExporterConfig,
    pub pages: PagesConfig,
}

#[derive(Deserialize, Debug)]
pub struct ExporterConfig {
    pub port: u16,
    /// Seconds between two scrapes
    pub frequency: u64,
    /// Upper bound of the random delay before each fetch, in milliseconds
    pub jitter_ms: u64,
    /// Request timeout in seconds
    pub timeout: u64,
    pub mode: ExtractionMode,
    pub user_agent: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct PagesConfig {
    pub urls: Vec<String>,
    pub url_file: Option<String>,
}

/// Loads settings from defaults, the settings file, `KOBO_*` environment
/// variables and command-line flags, in increasing order of precedence.
pub fn load_config(cli: &Cli) -> Result<AppConfig> {
    let settings = Config::builder()
        .set_default("exporter.port", 8080_i64)?
        .set_default("exporter.frequency", 600_i64)?
        .set_default("exporter.jitter_ms", 0_i64)?
        .set_default("exporter.timeout", 60_i64)?
        .set_default("exporter.mode", ExtractionMode::Full.as_str())?
        .set_default("pages.urls", Vec::<String>::new())?
        .add_source(File::new(&cli.settings, FileFormat::Toml).required(false))
        .add_source(
            Environment::with_prefix("KOBO")
                .prefix_separator("_")
                .separator("__"),
        )
        .set_override_option("exporter.port", cli.port.map(i64::from))?
        .set_override_option("exporter.frequency", cli.frequency)?
        .set_override_option("exporter.mode", cli.mode.map(|m| m.as_str()))?
        .set_override_option("pages.url_file", cli.url_file.clone())?
        .build()
        .with_context(|| format!("Failed to load settings from {}", cli.settings))?;

    let config = settings
        .try_deserialize::<AppConfig>()
        .context("Failed to parse settings")?;

    if config.exporter.frequency == 0 {
        bail!("Scrape frequency must be at least one second");
    }

    Ok(config)
}

impl AppConfig {
    /// Resolves the list of pages to scrape.
    ///
    /// A URL file takes precedence over URLs given on the command line, which
    /// take precedence over `pages.urls` from the settings.
    pub fn resolve_urls(&self, cli_urls: &[String]) -> Result<Vec<String>> {
        let urls = if let Some(path) = &self.pages.url_file {
            read_url_list(path)?
        } else if !cli_urls.is_empty() {
            cli_urls.to_vec()
        } else {
            self.pages.urls.clone()
        };

        if urls.is_empty() {
            bail!("No book pages configured");
        }

        Ok(urls)
    }
}
