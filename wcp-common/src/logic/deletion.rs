//! Deletion service (spec §4.3), grounded on
//! `env_common::logic::api_infra::destroy_infra`'s shape.

use chrono::Utc;
use uuid::Uuid;
use wcp_defs::messages::{BusMessage, DeleteWorkloadMessage};
use wcp_defs::WcpError;
use wcp_queue::{cluster_queue_name, Bus};
use wcp_store::{TimeSummaryRepo, WorkloadRepo};

pub async fn delete_workload<W, T>(
    pool: &sqlx::PgPool,
    bus: &Bus,
    workload_repo: &W,
    time_summary_repo: &T,
    workload_id: Uuid,
) -> Result<(), WcpError>
where
    W: WorkloadRepo,
    T: TimeSummaryRepo,
{
    let workload = workload_repo
        .get(pool, workload_id)
        .await
        .map_err(|e| WcpError::ExternalService(e.to_string()))?
        .ok_or_else(|| WcpError::NotFound(format!("workload {workload_id} not found")))?;

    if !workload.status.deletable() {
        let reason = if workload.status == wcp_defs::model::WorkloadStatus::Deleted {
            "already deleted"
        } else {
            "already deleting"
        };
        return Err(WcpError::conflict(reason));
    }

    let now = Utc::now();
    let elapsed = (now - workload.last_status_transition_at).num_seconds().max(0);

    let mut tx = pool.begin().await.map_err(|e| WcpError::ExternalService(e.to_string()))?;

    time_summary_repo
        .accumulate(&mut tx, workload_id, workload.status, elapsed)
        .await
        .map_err(|e| WcpError::ExternalService(e.to_string()))?;

    workload_repo
        .set_status(&mut tx, workload_id, wcp_defs::model::WorkloadStatus::Deleting, now)
        .await
        .map_err(|e| WcpError::ExternalService(e.to_string()))?;

    tx.commit().await.map_err(|e| WcpError::ExternalService(e.to_string()))?;

    let queue = cluster_queue_name(workload.cluster_id);
    bus.declare_queue(&queue).await.map_err(|e| WcpError::ExternalService(e.to_string()))?;
    bus.publish(&queue, &BusMessage::DeleteWorkload(DeleteWorkloadMessage { workload_id }))
        .await
        .map_err(|e| WcpError::ExternalService(e.to_string()))?;

    Ok(())
}
