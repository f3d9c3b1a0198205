// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_service::{DashboardEngine, DashboardService};
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::static_source::{StaticPredictionProvider, StaticSnapshotSource};
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{get_dashboard, get_series, health_check, refresh};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration; bad rules, selectors or charts stop startup here
    let config = load_app_config()?;
    let engine = DashboardEngine::from_config(&config)?;

    // Collaborators (infrastructure layer)
    let source = Arc::new(StaticSnapshotSource::from_config(&config)?);
    let predictor = Arc::new(StaticPredictionProvider::from_config(&config.predictions));

    // Create services (application layer)
    let dashboard_service = DashboardService::new(source, predictor, engine).await?;

    let state = Arc::new(AppState { dashboard_service });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/dashboard", get(get_dashboard))
        .route("/refresh", post(refresh))
        .route("/series", get(get_series))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Starting tunnel-ops-hub on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
