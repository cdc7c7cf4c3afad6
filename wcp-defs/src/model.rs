use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::kinds::{ComponentKind, ComponentStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkloadStatus {
    Pending,
    Running,
    Downloading,
    Complete,
    Terminated,
    Failed,
    Deleting,
    Deleted,
    DeleteFailed,
    Unknown,
}

impl WorkloadStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            WorkloadStatus::Deleted | WorkloadStatus::Complete | WorkloadStatus::Terminated | WorkloadStatus::Failed
        )
    }

    /// Preconditions for deletion, per spec §4.3.
    pub fn deletable(&self) -> bool {
        !matches!(self, WorkloadStatus::Deleting | WorkloadStatus::Deleted)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkloadType {
    ModelDownload,
    Inference,
    FineTuning,
    Workspace,
    Custom,
}

/// Recast of the source's single-table-inheritance `kind` discriminator
/// (see spec §9): a base `Workload` plus a sum type carrying the
/// kind-specific extra fields. `Managed` and `Aim` share one shape
/// because chart/AIM-catalog rendering is out of scope here (DESIGN.md
/// Open Question #3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum WorkloadDetails {
    Generic,
    Managed {
        chart_ref: String,
        output_hosts: Vec<String>,
    },
    Aim {
        chart_ref: String,
        output_hosts: Vec<String>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workload {
    pub id: Uuid,
    pub project_id: Uuid,
    pub cluster_id: Uuid,
    pub details: WorkloadDetails,
    pub workload_type: WorkloadType,
    pub display_name: String,
    pub status: WorkloadStatus,
    pub last_status_transition_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_by: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadComponent {
    pub id: Uuid,
    pub workload_id: Uuid,
    pub name: String,
    pub kind: ComponentKind,
    pub api_version: String,
    pub status: ComponentStatus,
    pub status_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WorkloadComponent {
    /// spec §3 invariant: an inbound event is dropped unless its
    /// `updated_at` strictly exceeds the component's current `updated_at`.
    pub fn accepts_event_at(&self, event_updated_at: DateTime<Utc>) -> bool {
        event_updated_at > self.updated_at
    }
}

/// Read-only view handed to the status resolver — just enough to decide
/// the aggregate, nothing persistence-specific.
#[derive(Debug, Clone, Copy)]
pub struct ComponentView {
    pub kind: ComponentKind,
    pub status: ComponentStatus,
}

impl From<&WorkloadComponent> for ComponentView {
    fn from(c: &WorkloadComponent) -> Self {
        ComponentView { kind: c.kind, status: c.status }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadTimeSummary {
    pub id: Uuid,
    pub workload_id: Uuid,
    pub status: WorkloadStatus,
    pub total_elapsed_seconds: i64,
}
