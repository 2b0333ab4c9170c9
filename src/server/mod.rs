//! HTTP server module
//!
//! Provides the Axum-based HTTP server for serving metrics.

pub mod handlers;

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use anyhow::Result;
use axum::{routing::get, Router};
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::collector::{Collector, JolokiaClient};
use crate::config::Config;
use crate::error::AppResult;
use crate::metrics::ExporterMetrics;
use crate::sink::SnapshotSink;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<Config>,
    /// Collection cycle runner
    pub collector: Arc<Collector>,
    /// Latest complete cycle, read by the metrics handler
    pub sink: Arc<SnapshotSink>,
    /// Exporter self-metrics
    pub stats: Arc<ExporterMetrics>,
}

/// Wire the client, collector and sink together for a validated config
///
/// # Errors
/// Returns an error if the HTTP client or the bulk request cannot be built
pub fn build_state(config: Config) -> AppResult<AppState> {
    let client = JolokiaClient::from_config(&config.jolokia)?;
    let sink = Arc::new(SnapshotSink::new());
    let stats = Arc::new(ExporterMetrics::new());
    let collector = Collector::new(client, &config.metrics, sink.clone(), stats.clone())?;

    Ok(AppState {
        config: Arc::new(config),
        collector: Arc::new(collector),
        sink,
        stats,
    })
}

/// Build the router for the given state
pub fn router(state: AppState) -> Router {
    let metrics_path = state.config.server.path.clone();

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route(&metrics_path, get(handlers::metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the HTTP server until a shutdown signal arrives
///
/// # Errors
/// Returns an error if the bind address is invalid or the listener fails
pub async fn run(config: Config) -> Result<()> {
    let addr = socket_addr(&config.server.bind_address, config.server.port)?;
    let metrics_path = config.server.path.clone();
    let jolokia_url = config.jolokia.url.clone();
    let mappings = config.metrics.len();

    let app = router(build_state(config)?);

    info!(
        address = %addr,
        metrics_path = %metrics_path,
        jolokia_url = %jolokia_url,
        mappings,
        "Server listening"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolve the listener address; "localhost" maps to the IPv4 loopback
fn socket_addr(bind_address: &str, port: u16) -> Result<SocketAddr> {
    let ip: IpAddr = if bind_address == "localhost" {
        IpAddr::V4(Ipv4Addr::LOCALHOST)
    } else {
        bind_address.parse().map_err(|e| {
            anyhow::anyhow!(
                "Invalid bind_address '{}': {}. Use an IP address (e.g., '0.0.0.0', '127.0.0.1') or 'localhost'.",
                bind_address,
                e
            )
        })?
    };

    Ok(SocketAddr::from((ip, port)))
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        }
    }
}
