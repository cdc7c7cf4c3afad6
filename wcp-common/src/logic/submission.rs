//! Submission service (spec §4.2), grounded on
//! `env_common::logic::api_infra::mutate_infra`/`submit_claim_job`'s
//! shape: validate → one DB transaction → commit → publish. Unlike the
//! teacher (which the spec's Open Question #2 flags as acking/publishing
//! inconsistently around the commit point), this always commits first.

use chrono::Utc;
use uuid::Uuid;
use wcp_defs::model::{Workload, WorkloadComponent, WorkloadDetails, WorkloadStatus, WorkloadType};
use wcp_defs::{ComponentStatus, WcpError};
use wcp_defs::kinds::CommonComponentStatus;
use wcp_defs::messages::{BusMessage, WorkloadMessage};
use wcp_queue::{cluster_queue_name, Bus};
use wcp_store::{ComponentRepo, DbClusterRepo, ClusterRepo, WorkloadRepo};
use wcp_utils::manifest::inject_and_validate;

use crate::cluster_health::{evaluate, ClusterHealth};

pub struct SubmissionInput {
    pub project_id: Uuid,
    pub project_name: String,
    pub cluster_id: Uuid,
    pub manifest_bytes: Vec<u8>,
    pub workload_type: WorkloadType,
    pub display_name: String,
    pub submitter: String,
    pub user_token: String,
}

pub struct SubmissionResult {
    pub workload_id: Uuid,
    pub status: WorkloadStatus,
    pub workload_type: WorkloadType,
    pub display_name: String,
}

pub async fn submit_workload<W, C>(
    pool: &sqlx::PgPool,
    bus: &Bus,
    workload_repo: &W,
    component_repo: &C,
    health_window: chrono::Duration,
    input: SubmissionInput,
) -> Result<SubmissionResult, WcpError>
where
    W: WorkloadRepo,
    C: ComponentRepo,
{
    let cluster_repo = DbClusterRepo;
    let last_heartbeat = cluster_repo
        .last_heartbeat_at(pool, input.cluster_id)
        .await
        .map_err(|e| WcpError::ExternalService(e.to_string()))?;

    if evaluate(last_heartbeat, Utc::now(), health_window) == ClusterHealth::Unhealthy {
        return Err(WcpError::PreconditionFailed("cluster is unhealthy".into()));
    }

    let workload_id = Uuid::new_v4();
    let (descriptors, transformed_manifest) =
        inject_and_validate(&input.manifest_bytes, workload_id, input.project_id, &input.project_name)?;

    let now = Utc::now();
    let workload = Workload {
        id: workload_id,
        project_id: input.project_id,
        cluster_id: input.cluster_id,
        details: WorkloadDetails::Generic,
        workload_type: input.workload_type,
        display_name: input.display_name.clone(),
        status: WorkloadStatus::Pending,
        last_status_transition_at: now,
        created_at: now,
        updated_at: now,
        created_by: input.submitter.clone(),
        updated_by: input.submitter,
    };

    let mut tx = pool.begin().await.map_err(|e| WcpError::ExternalService(e.to_string()))?;

    workload_repo
        .insert(&mut tx, &workload)
        .await
        .map_err(|e| WcpError::ExternalService(e.to_string()))?;

    for d in &descriptors {
        let component = WorkloadComponent {
            id: d.id,
            workload_id,
            name: d.name.clone(),
            kind: d.kind,
            api_version: d.api_version.clone(),
            status: ComponentStatus::Common(CommonComponentStatus::Registered),
            status_reason: None,
            created_at: now,
            updated_at: now,
        };
        component_repo
            .insert(&mut tx, &component)
            .await
            .map_err(|e| WcpError::ExternalService(e.to_string()))?;
    }

    tx.commit().await.map_err(|e| WcpError::ExternalService(e.to_string()))?;

    // Commit has already happened: a publish failure here is surfaced to
    // the caller, but the workload row and its components already exist
    // (spec §4.2 — "leaves the workload in PENDING with no components
    // outside the DB" is not possible under this ordering; what can
    // happen is a PENDING workload the dispatcher never hears about,
    // which the caller may then delete).
    let queue = cluster_queue_name(input.cluster_id);
    bus.declare_queue(&queue).await.map_err(|e| WcpError::ExternalService(e.to_string()))?;
    bus.publish(
        &queue,
        &BusMessage::Workload(WorkloadMessage {
            workload_id,
            manifest: transformed_manifest,
            user_token: input.user_token,
        }),
    )
    .await
    .map_err(|e| WcpError::ExternalService(e.to_string()))?;

    Ok(SubmissionResult {
        workload_id,
        status: WorkloadStatus::Pending,
        workload_type: workload.workload_type,
        display_name: workload.display_name,
    })
}
