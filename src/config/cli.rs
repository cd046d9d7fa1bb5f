use clap::Parser;

use crate::config::config::ExtractionMode;

/// Prometheus exporter for Kobo e-book prices.
#[derive(Parser, Debug, Default)]
#[command(version, about)]
pub struct Cli {
    /// Port for metrics server
    #[arg(long)]
    pub port: Option<u16>,

    /// Scrape frequency in seconds
    #[arg(long)]
    pub frequency: Option<u64>,

    /// Config file (line-delimited URLs)
    #[arg(long = "config", value_name = "FILE")]
    pub url_file: Option<String>,

    /// Settings file (TOML)
    #[arg(long, value_name = "FILE", default_value = "Settings.toml")]
    pub settings: String,

    /// Which fields to publish
    #[arg(long, value_enum)]
    pub mode: Option<ExtractionMode>,

    /// Book page URLs, used when no config file is given
    pub urls: Vec<String>,
}
