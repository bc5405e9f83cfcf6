// HTTP request handlers
use crate::domain::dashboard::{Dashboard, DashboardCharts};
use crate::domain::stats::DashboardStats;
use crate::presentation::app_state::AppState;
use axum::{Json, extract::State};
use serde::Serialize;
use std::sync::Arc;

/// Response envelope for the rendering layer. A failed fetch yields
/// `success: false` with the error text and no partial statistics.
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<DashboardStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charts: Option<DashboardCharts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DashboardResponse {
    fn success(dashboard: Dashboard) -> Self {
        Self {
            success: true,
            stats: Some(dashboard.stats),
            charts: Some(dashboard.charts),
            error: None,
        }
    }

    fn failure(message: String) -> Self {
        Self {
            success: false,
            stats: None,
            charts: None,
            error: Some(message),
        }
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Build and return the full dashboard. Always HTTP 200; failures are
/// reported through the `success` flag.
pub async fn get_dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardResponse> {
    match state.dashboard_service.get_dashboard().await {
        Ok(dashboard) => Json(DashboardResponse::success(dashboard)),
        Err(e) => {
            tracing::error!("Error building dashboard: {}", e);
            Json(DashboardResponse::failure(e.to_string()))
        }
    }
}
