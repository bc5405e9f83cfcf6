// Dashboard domain model
use super::stats::DashboardStats;
use serde::Serialize;

/// The four chart payloads, each a self-contained serialized document
/// (`{"data": [...], "layout": {...}}`) ready for the rendering layer.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardCharts {
    pub resource_support: String,
    pub service_distribution: String,
    pub crisis_wish: String,
    pub age_histogram: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub stats: DashboardStats,
    pub charts: DashboardCharts,
}

impl Dashboard {
    pub fn new(stats: DashboardStats, charts: DashboardCharts) -> Self {
        Self { stats, charts }
    }
}
