mod config;
mod error;
mod handlers;
mod state;
mod structs;

use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;
use chrono::Duration;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use wcp_common::logic::feedback::{self, FeedbackDeps};
use wcp_queue::{Bus, FEEDBACK_QUEUE};
use wcp_store::{connect_postgres, DbComponentRepo, DbProjectRepo, DbStatsRepo, DbTimeSummaryRepo, DbWorkloadRepo};

use crate::config::Config;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(handlers::submit, handlers::delete, handlers::get, handlers::list, handlers::stats),
    components(schemas(
        structs::WorkloadV1,
        structs::ComponentV1,
        structs::WorkloadSummaryV1,
        structs::SubmitResponseV1,
        structs::StatCountV1
    )),
    tags((name = "workloads", description = "Workload control plane API"))
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    wcp_utils::logging::setup_logging()?;
    let config = Config::from_env()?;

    let pool = connect_postgres(&config.database_url).await?;
    let bus = Arc::new(Bus::connect(&config.rabbitmq_url).await?);
    bus.declare_queue(FEEDBACK_QUEUE).await?;

    let state = Arc::new(AppState {
        pool: pool.clone(),
        bus: bus.clone(),
        workload_repo: Arc::new(DbWorkloadRepo),
        component_repo: Arc::new(DbComponentRepo),
        time_summary_repo: Arc::new(DbTimeSummaryRepo),
        project_repo: Arc::new(DbProjectRepo),
        stats_repo: Arc::new(DbStatsRepo),
        health_window: Duration::seconds(config.health_window_seconds),
    });

    let feedback_pool = pool.clone();
    let feedback_bus = bus.clone();
    tokio::spawn(async move {
        let workload_repo = DbWorkloadRepo;
        let component_repo = DbComponentRepo;
        let time_summary_repo = DbTimeSummaryRepo;
        let deps = FeedbackDeps {
            pool: &feedback_pool,
            workload_repo: &workload_repo,
            component_repo: &component_repo,
            time_summary_repo: &time_summary_repo,
        };
        if let Err(e) = feedback::run(&feedback_bus, deps).await {
            log::error!("feedback consumer exited: {e}");
        }
    });

    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/v1/workloads", post(handlers::submit))
        .route("/api/v1/workloads/{workload_id}", get(handlers::get))
        .route("/api/v1/workloads/{workload_id}", delete(handlers::delete))
        .route("/api/v1/projects/{project_id}/workloads", get(handlers::list))
        .route("/api/v1/stats", get(handlers::stats))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    log::info!("wcp-api listening on {}", config.bind_addr);
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
