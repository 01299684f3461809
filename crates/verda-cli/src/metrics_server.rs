//! Prometheus exposition endpoint.

use std::sync::Arc;

use axum::{extract::State, routing::get, Router};

use verda_chat::UsageMetrics;

/// Serve `GET /metrics` until the process exits.
pub(crate) async fn serve(metrics: Arc<UsageMetrics>, port: u16) -> std::io::Result<()> {
    let app = Router::new()
        .route("/metrics", get(render))
        .with_state(metrics);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    tracing::debug!("metrics endpoint listening on port {}", port);
    axum::serve(listener, app).await
}

async fn render(State(metrics): State<Arc<UsageMetrics>>) -> String {
    metrics.render_prometheus()
}
