use axum::extract::State;
use axum::response::Html;

use crate::server::serve_metrics::AppState;

pub async fn landing_page(State(state): State<AppState>) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Kobo Exporter</title></head>
<body>
<h1>Kobo Exporter</h1>
<p>Version {}. Watching {} book page(s), in {} mode.</p>
<p><a href="/metrics">Metrics</a></p>
</body>
</html>
"#,
        env!("CARGO_PKG_VERSION"),
        state.page_count,
        state.mode.as_str()
    ))
}
