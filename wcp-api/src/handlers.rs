//! HTTP handlers. Shape mirrors `webserver-openapi::main`'s handler
//! style: thin functions that resolve a backing call and translate its
//! result into a status code + JSON body, one `#[utoipa::path]` per
//! route. Submission/deletion/status-resolution logic itself lives in
//! `wcp-common`; these handlers only adapt HTTP in/out.

use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::response::IntoResponse;
use axum::Json;
use hyper::StatusCode;
use uuid::Uuid;
use wcp_common::logic::deletion::delete_workload;
use wcp_common::logic::submission::{submit_workload, SubmissionInput};
use wcp_defs::model::WorkloadType;
use wcp_defs::WcpError;

use crate::error::ApiError;
use crate::state::AppState;
use crate::structs::{StatCountV1, SubmitResponseV1, WorkloadSummaryV1, WorkloadV1};

#[utoipa::path(
    post,
    path = "/api/v1/workloads",
    responses((status = 201, description = "Workload accepted", body = SubmitResponseV1)),
    description = "Submit a manifest as a new workload"
)]
pub async fn submit(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> Result<impl IntoResponse, ApiError> {
    let mut project_id: Option<Uuid> = None;
    let mut workload_type: Option<WorkloadType> = None;
    let mut display_name: Option<String> = None;
    let mut submitter: Option<String> = None;
    let mut user_token: Option<String> = None;
    let mut manifest_bytes: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| WcpError::validation(e.to_string()))? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "manifest" => {
                manifest_bytes = Some(field.bytes().await.map_err(|e| WcpError::validation(e.to_string()))?.to_vec());
            }
            "project_id" => {
                let text = field.text().await.map_err(|e| WcpError::validation(e.to_string()))?;
                project_id = Some(Uuid::parse_str(&text).map_err(|e| WcpError::validation(e.to_string()))?);
            }
            "workload_type" => {
                let text = field.text().await.map_err(|e| WcpError::validation(e.to_string()))?;
                workload_type = Some(
                    serde_json::from_value(serde_json::Value::String(text.clone()))
                        .map_err(|_| WcpError::validation(format!("unknown workload_type `{text}`")))?,
                );
            }
            "display_name" => {
                display_name = Some(field.text().await.map_err(|e| WcpError::validation(e.to_string()))?);
            }
            "submitter" => {
                submitter = Some(field.text().await.map_err(|e| WcpError::validation(e.to_string()))?);
            }
            "user_token" => {
                user_token = Some(field.text().await.map_err(|e| WcpError::validation(e.to_string()))?);
            }
            _ => {}
        }
    }

    let project_id = project_id.ok_or_else(|| WcpError::validation("missing `project_id` field"))?;
    let manifest_bytes = manifest_bytes.ok_or_else(|| WcpError::validation("missing `manifest` field"))?;
    let workload_type = workload_type.ok_or_else(|| WcpError::validation("missing `workload_type` field"))?;
    let display_name = display_name.ok_or_else(|| WcpError::validation("missing `display_name` field"))?;
    let submitter = submitter.unwrap_or_else(|| "unknown".to_string());
    let user_token = user_token.unwrap_or_default();

    let project = state
        .project_repo
        .get(&state.pool, project_id)
        .await
        .map_err(|e| WcpError::ExternalService(e.to_string()))?
        .ok_or_else(|| WcpError::NotFound(format!("project {project_id} not found")))?;

    let result = submit_workload(
        &state.pool,
        &state.bus,
        state.workload_repo.as_ref(),
        state.component_repo.as_ref(),
        state.health_window,
        SubmissionInput {
            project_id: project.id,
            project_name: project.name,
            cluster_id: project.cluster_id,
            manifest_bytes,
            workload_type,
            display_name,
            submitter,
            user_token,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponseV1 {
            workload_id: result.workload_id,
            status: result.status,
            workload_type: result.workload_type,
            display_name: result.display_name,
        }),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/workloads/{workload_id}",
    params(("workload_id" = Uuid, Path, description = "Workload to delete")),
    responses((status = 202, description = "Deletion accepted")),
    description = "Request deletion of a workload"
)]
pub async fn delete(State(state): State<Arc<AppState>>, Path(workload_id): Path<Uuid>) -> Result<impl IntoResponse, ApiError> {
    delete_workload(&state.pool, &state.bus, state.workload_repo.as_ref(), state.time_summary_repo.as_ref(), workload_id)
        .await?;
    Ok(StatusCode::ACCEPTED)
}

#[utoipa::path(
    get,
    path = "/api/v1/workloads/{workload_id}",
    params(("workload_id" = Uuid, Path, description = "Workload to look up")),
    responses((status = 200, description = "Workload with embedded components", body = WorkloadV1)),
    description = "Look up a workload and its components"
)]
pub async fn get(State(state): State<Arc<AppState>>, Path(workload_id): Path<Uuid>) -> Result<impl IntoResponse, ApiError> {
    let workload = state
        .workload_repo
        .get(&state.pool, workload_id)
        .await
        .map_err(|e| WcpError::ExternalService(e.to_string()))?
        .ok_or_else(|| WcpError::NotFound(format!("workload {workload_id} not found")))?;

    let components = state
        .component_repo
        .list_for_workload(&state.pool, workload_id)
        .await
        .map_err(|e| WcpError::ExternalService(e.to_string()))?;

    Ok(Json(WorkloadV1::from_domain(&workload, &components)))
}

#[utoipa::path(
    get,
    path = "/api/v1/projects/{project_id}/workloads",
    params(("project_id" = Uuid, Path, description = "Project to list workloads for")),
    responses((status = 200, description = "Workloads belonging to the project, most recent first", body = Vec<WorkloadSummaryV1>)),
    description = "List workloads for a project"
)]
pub async fn list(State(state): State<Arc<AppState>>, Path(project_id): Path<Uuid>) -> Result<impl IntoResponse, ApiError> {
    let workloads = state
        .workload_repo
        .list_for_project(&state.pool, project_id)
        .await
        .map_err(|e| WcpError::ExternalService(e.to_string()))?;

    Ok(Json(workloads.iter().map(WorkloadSummaryV1::from_domain).collect::<Vec<_>>()))
}

#[utoipa::path(
    get,
    path = "/api/v1/stats",
    responses((status = 200, description = "Running/pending counts by cluster/project", body = Vec<StatCountV1>)),
    description = "Workload status counts, grouped by cluster and project"
)]
pub async fn stats(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let counts = state
        .stats_repo
        .status_counts(&state.pool)
        .await
        .map_err(|e| WcpError::ExternalService(e.to_string()))?;

    let result: Vec<StatCountV1> = counts
        .into_iter()
        .map(|c| StatCountV1 { cluster_id: c.cluster_id, project_id: c.project_id, status: c.status, count: c.count })
        .collect();

    Ok(Json(result))
}
