// HTTP request handlers
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use crate::presentation::error::AppError;
use axum::{extract::State, http::HeaderMap, response::Response};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub completed: bool,
    pub cycle: u64,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Latest dashboard (runs the first cycle lazily)
pub async fn get_dashboard(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, AppError> {
    let dashboard = state.dashboard_service.current().await.map_err(|e| {
        tracing::warn!("Dashboard unavailable: {:#}", e);
        e
    })?;
    Ok(json_response(&dashboard, accepts_brotli(&headers)).await?)
}

/// Refresh trigger: one full recomputation cycle
pub async fn refresh(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, AppError> {
    let dashboard = state.dashboard_service.refresh().await.map_err(|e| {
        tracing::warn!("Refresh cycle failed: {:#}", e);
        e
    })?;
    let body = RefreshResponse {
        completed: true,
        cycle: dashboard.cycle,
    };
    Ok(json_response(&body, accepts_brotli(&headers)).await?)
}

/// Read-only copy of the charted history
pub async fn get_series(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, AppError> {
    let series = state.dashboard_service.series().await;
    Ok(json_response(&series, accepts_brotli(&headers)).await?)
}
