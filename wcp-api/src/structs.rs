//! Wire-level response/request shapes, separate from the `wcp-defs`
//! domain types so the HTTP contract can drift independently (the
//! teacher's `webserver-openapi::structs` keeps the same separation:
//! `ModuleV1`/`DeploymentV1` vs. `env_defs::ModuleResp`/`DeploymentResp`).
//! The HTTP surface here is explicitly incidental (spec §1 non-goal); it
//! exists to exercise the services, not to freeze a contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wcp_defs::model::{Workload, WorkloadComponent, WorkloadStatus, WorkloadType};

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct WorkloadV1 {
    pub id: Uuid,
    pub project_id: Uuid,
    pub cluster_id: Uuid,
    pub workload_type: WorkloadType,
    pub display_name: String,
    pub status: WorkloadStatus,
    pub last_status_transition_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub components: Vec<ComponentV1>,
}

impl WorkloadV1 {
    pub fn from_domain(w: &Workload, components: &[WorkloadComponent]) -> Self {
        WorkloadV1 {
            id: w.id,
            project_id: w.project_id,
            cluster_id: w.cluster_id,
            workload_type: w.workload_type,
            display_name: w.display_name.clone(),
            status: w.status,
            last_status_transition_at: w.last_status_transition_at,
            created_at: w.created_at,
            components: components.iter().map(ComponentV1::from_domain).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ComponentV1 {
    pub id: Uuid,
    pub name: String,
    pub kind: String,
    pub status: serde_json::Value,
    pub status_reason: Option<String>,
}

impl ComponentV1 {
    pub fn from_domain(c: &WorkloadComponent) -> Self {
        ComponentV1 {
            id: c.id,
            name: c.name.clone(),
            kind: format!("{:?}", c.kind),
            status: serde_json::to_value(c.status).unwrap_or(serde_json::Value::Null),
            status_reason: c.status_reason.clone(),
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct WorkloadSummaryV1 {
    pub id: Uuid,
    pub project_id: Uuid,
    pub workload_type: WorkloadType,
    pub display_name: String,
    pub status: WorkloadStatus,
    pub last_status_transition_at: DateTime<Utc>,
}

impl WorkloadSummaryV1 {
    pub fn from_domain(w: &Workload) -> Self {
        WorkloadSummaryV1 {
            id: w.id,
            project_id: w.project_id,
            workload_type: w.workload_type,
            display_name: w.display_name.clone(),
            status: w.status,
            last_status_transition_at: w.last_status_transition_at,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SubmitResponseV1 {
    pub workload_id: Uuid,
    pub status: WorkloadStatus,
    pub workload_type: WorkloadType,
    pub display_name: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct StatCountV1 {
    pub cluster_id: Uuid,
    pub project_id: Uuid,
    pub status: WorkloadStatus,
    pub count: i64,
}
