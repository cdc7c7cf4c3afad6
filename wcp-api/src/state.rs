use std::sync::Arc;

use chrono::Duration;
use sqlx::PgPool;
use wcp_queue::Bus;
use wcp_store::{ComponentRepo, ProjectRepo, StatsRepo, TimeSummaryRepo, WorkloadRepo};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub bus: Arc<Bus>,
    pub workload_repo: Arc<dyn WorkloadRepo>,
    pub component_repo: Arc<dyn ComponentRepo>,
    pub time_summary_repo: Arc<dyn TimeSummaryRepo>,
    pub project_repo: Arc<dyn ProjectRepo>,
    pub stats_repo: Arc<dyn StatsRepo>,
    pub health_window: Duration,
}
