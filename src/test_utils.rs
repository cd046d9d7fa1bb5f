use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use reqwest::Client;
use tokio::net::TcpListener;

use crate::config::config::ExtractionMode;
use crate::metrics::exporter_metrics::ExporterMetrics;
use crate::scrape_book::ScrapeContext;

const DUNE_PAGE: &str = r#"<html><body>
  <div class="item-info">
    <h2 class="title">Dune</h2>
    <a class="contributor-name" href="/author/frank">Frank Herbert</a>
    <div class="active-price"><span class="price">13,69 €</span></div>
  </div>
</body></html>"#;

const SOLD_OUT_PAGE: &str = r#"<html><body>
  <div class="item-info"><h2 class="title">Dune</h2><p>Not available</p></div>
</body></html>"#;

/// Serves fixture book pages on an ephemeral local port and returns its base URL.
pub async fn book_server() -> String {
    let app = Router::new()
        .route("/dune", get(|| async { Html(DUNE_PAGE) }))
        .route("/sold-out", get(|| async { Html(SOLD_OUT_PAGE) }))
        .route("/gone", get(|| async { (StatusCode::NOT_FOUND, "gone") }));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", address)
}

pub fn context(mode: ExtractionMode) -> ScrapeContext {
    ScrapeContext {
        client: Client::builder().no_proxy().build().unwrap(),
        metrics: Arc::new(ExporterMetrics::new(mode).unwrap()),
        mode,
        jitter_ms: 0,
    }
}
