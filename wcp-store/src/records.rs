//! `FromRow` records mirroring the schema, plus `TryFrom`/`From`
//! conversions to/from the domain model in `wcp-defs`. Keeping these
//! separate from `wcp_defs::model` (rather than deriving `FromRow`
//! directly on the domain structs) is the same separation
//! `golemcloud-golem`'s `repo/component.rs` uses: the domain struct's
//! `WorkloadDetails`/`ComponentStatus` enums don't map onto flat columns,
//! so the record owns the JSONB/text encoding and the conversion owns
//! the translation.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;
use wcp_defs::model::{Workload, WorkloadComponent, WorkloadStatus, WorkloadTimeSummary, WorkloadType};
use wcp_defs::kinds::ComponentKind;
use wcp_defs::WcpError;

#[derive(Debug, FromRow)]
pub struct WorkloadRecord {
    pub id: Uuid,
    pub project_id: Uuid,
    pub cluster_id: Uuid,
    pub details: serde_json::Value,
    pub workload_type: String,
    pub display_name: String,
    pub status: String,
    pub last_status_transition_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_by: String,
}

impl TryFrom<WorkloadRecord> for Workload {
    type Error = WcpError;

    fn try_from(r: WorkloadRecord) -> Result<Self, Self::Error> {
        Ok(Workload {
            id: r.id,
            project_id: r.project_id,
            cluster_id: r.cluster_id,
            details: serde_json::from_value(r.details)
                .map_err(|e| WcpError::InconsistentState(format!("bad details column: {e}")))?,
            workload_type: workload_type_from_str(&r.workload_type)?,
            display_name: r.display_name,
            status: workload_status_from_str(&r.status)?,
            last_status_transition_at: r.last_status_transition_at,
            created_at: r.created_at,
            updated_at: r.updated_at,
            created_by: r.created_by,
            updated_by: r.updated_by,
        })
    }
}

pub fn workload_type_from_str(s: &str) -> Result<WorkloadType, WcpError> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|e| WcpError::InconsistentState(format!("bad workload_type column `{s}`: {e}")))
}

pub fn workload_status_from_str(s: &str) -> Result<WorkloadStatus, WcpError> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|e| WcpError::InconsistentState(format!("bad status column `{s}`: {e}")))
}

pub fn workload_status_to_str(s: WorkloadStatus) -> String {
    serde_json::to_value(s).unwrap().as_str().unwrap().to_string()
}

pub fn workload_type_to_str(t: WorkloadType) -> String {
    serde_json::to_value(t).unwrap().as_str().unwrap().to_string()
}

#[derive(Debug, FromRow)]
pub struct ComponentRecord {
    pub id: Uuid,
    pub workload_id: Uuid,
    pub name: String,
    pub kind: String,
    pub api_version: String,
    pub status: serde_json::Value,
    pub status_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ComponentRecord> for WorkloadComponent {
    type Error = WcpError;

    fn try_from(r: ComponentRecord) -> Result<Self, Self::Error> {
        Ok(WorkloadComponent {
            id: r.id,
            workload_id: r.workload_id,
            name: r.name,
            kind: component_kind_from_str(&r.kind)?,
            api_version: r.api_version,
            status: serde_json::from_value(r.status)
                .map_err(|e| WcpError::InconsistentState(format!("bad status column: {e}")))?,
            status_reason: r.status_reason,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

pub fn component_kind_from_str(s: &str) -> Result<ComponentKind, WcpError> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|e| WcpError::InconsistentState(format!("bad kind column `{s}`: {e}")))
}

pub fn component_kind_to_str(k: ComponentKind) -> String {
    serde_json::to_value(k).unwrap().as_str().unwrap().to_string()
}

#[derive(Debug, FromRow)]
pub struct TimeSummaryRecord {
    pub id: Uuid,
    pub workload_id: Uuid,
    pub status: String,
    pub total_elapsed_seconds: i64,
}

impl TryFrom<TimeSummaryRecord> for WorkloadTimeSummary {
    type Error = WcpError;

    fn try_from(r: TimeSummaryRecord) -> Result<Self, Self::Error> {
        Ok(WorkloadTimeSummary {
            id: r.id,
            workload_id: r.workload_id,
            status: workload_status_from_str(&r.status)?,
            total_elapsed_seconds: r.total_elapsed_seconds,
        })
    }
}
