//! HTTP request handlers
//!
//! Contains handlers for all HTTP endpoints.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    Json,
};
use serde::Serialize;
use tracing::instrument;

use super::AppState;
use crate::exposition::{self, PrometheusFormatter, CONTENT_TYPE};

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    /// Health status
    status: String,
    /// Application version
    version: String,
}

/// Root endpoint - displays basic info
pub async fn root(State(state): State<AppState>) -> Html<String> {
    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Jolokia Exporter</title>
</head>
<body>
    <h1>Jolokia Exporter</h1>
    <p>Version: {}</p>
    <p>Endpoint: {}</p>
    <ul>
        <li><a href="/health">Health Check</a></li>
        <li><a href="{}">Metrics</a></li>
    </ul>
</body>
</html>"#,
        env!("CARGO_PKG_VERSION"),
        state.collector.client().url(),
        state.config.server.path
    );
    Html(html)
}

/// Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Metrics endpoint - runs one collection cycle and renders its signals
///
/// A failed cycle still answers 200: the snapshot carries `up` and
/// `response_duration` so the scraper can see the failure.
#[instrument(skip(state), name = "metrics_handler")]
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    // failures are logged and counted by the collector
    let _ = state.collector.collect().await;

    let namespace = &state.config.namespace;
    let snapshot = state.sink.snapshot();

    let mut metrics = exposition::from_samples(namespace, &snapshot);
    metrics.extend(state.stats.to_prometheus_metrics(namespace));

    let output = PrometheusFormatter::new().format(&metrics);

    (StatusCode::OK, [(header::CONTENT_TYPE, CONTENT_TYPE)], output)
}
