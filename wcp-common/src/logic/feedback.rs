//! Feedback consumer (spec §4.4 tail, §9 Open Question #2): reads the
//! shared feedback queue, applies the three dispatcher→API message
//! variants, re-runs the status resolver on every applied component
//! event, and maintains the time-in-status summaries. Grounded in shape
//! on `env_common::interface::deployment_status_handler`'s
//! accumulate-then-resolve builder pattern, generalized from a single
//! deployment's status/event history to the resolver's pure
//! multi-component view.

use chrono::{DateTime, Utc};
use wcp_defs::messages::{
    AutoDiscoveredWorkloadComponentMessage, BusMessage, WorkloadComponentStatusMessage, WorkloadStatusMessage,
};
use wcp_defs::model::{ComponentView, WorkloadComponent};
use wcp_defs::kinds::CommonComponentStatus;
use wcp_defs::{ComponentStatus, WcpError};
use wcp_queue::{Bus, Delivery, FEEDBACK_QUEUE};
use wcp_store::{ComponentRepo, TimeSummaryRepo, WorkloadRepo};

use crate::logic::status_resolver::resolve;

pub struct FeedbackDeps<'a, W, C, T> {
    pub pool: &'a sqlx::PgPool,
    pub workload_repo: &'a W,
    pub component_repo: &'a C,
    pub time_summary_repo: &'a T,
}

/// Runs forever, consuming `feedback.common`. A single message's
/// processing failure is logged and the message is dropped (not
/// requeued) — spec §7's "poison messages are shunted, never blocking
/// the queue" policy — everything else continues.
pub async fn run<W, C, T>(bus: &Bus, deps: FeedbackDeps<'_, W, C, T>) -> anyhow::Result<()>
where
    W: WorkloadRepo,
    C: ComponentRepo,
    T: TimeSummaryRepo,
{
    bus.declare_queue(FEEDBACK_QUEUE).await?;
    let mut consumer = bus.consume(FEEDBACK_QUEUE, "wcp-api-feedback").await?;

    use futures::StreamExt;
    while let Some(delivery) = consumer.next().await {
        let raw = match delivery {
            Ok(d) => d,
            Err(e) => {
                log::error!("feedback consumer delivery error: {e}");
                continue;
            }
        };

        let decoded = match Delivery::from_raw(raw) {
            Ok(d) => d,
            Err(e) => {
                log::error!("dropping undecodable feedback message: {e}");
                continue;
            }
        };

        let result = apply_one(&decoded.message, &deps).await;
        match result {
            Ok(()) => {
                if let Err(e) = decoded.ack().await {
                    log::error!("failed to ack feedback message after commit: {e}");
                }
            }
            Err(e) => {
                log::error!("dropping feedback message after apply failure: {e}");
                // Ack anyway: the message has already been durably
                // reflected as "processed" at the log level, and a
                // malformed/unknown-component message will never
                // succeed on redelivery either.
                if let Err(ack_err) = decoded.ack().await {
                    log::error!("failed to ack poison feedback message: {ack_err}");
                }
            }
        }
    }

    Ok(())
}

async fn apply_one<W, C, T>(message: &BusMessage, deps: &FeedbackDeps<'_, W, C, T>) -> Result<(), WcpError>
where
    W: WorkloadRepo,
    C: ComponentRepo,
    T: TimeSummaryRepo,
{
    match message {
        BusMessage::WorkloadStatus(m) => apply_workload_status(deps, m).await,
        BusMessage::WorkloadComponentStatusUpdate(m) => apply_component_status(deps, m).await,
        BusMessage::AutoDiscoveredWorkloadComponent(m) => apply_auto_discovered(deps, m).await,
        BusMessage::Workload(_) | BusMessage::DeleteWorkload(_) => Err(WcpError::InconsistentState(
            "API->dispatcher message observed on the feedback queue".into(),
        )),
    }
}

/// Applies a direct workload-status message (e.g. the dispatcher's
/// "no resources found for deletion" -> DELETED path, spec §4.5). This
/// bypasses the resolver: there is no component multiset to re-derive
/// from, the dispatcher is asserting the terminal state directly.
async fn apply_workload_status<W, C, T>(
    deps: &FeedbackDeps<'_, W, C, T>,
    message: &WorkloadStatusMessage,
) -> Result<(), WcpError>
where
    W: WorkloadRepo,
    C: ComponentRepo,
    T: TimeSummaryRepo,
{
    let workload = deps
        .workload_repo
        .get(deps.pool, message.workload_id)
        .await
        .map_err(|e| WcpError::ExternalService(e.to_string()))?
        .ok_or_else(|| WcpError::NotFound(format!("workload {} not found", message.workload_id)))?;

    if workload.status == message.status {
        return Ok(());
    }

    let elapsed = (message.updated_at - workload.last_status_transition_at).num_seconds().max(0);

    let mut tx = deps.pool.begin().await.map_err(|e| WcpError::ExternalService(e.to_string()))?;
    deps.time_summary_repo
        .accumulate(&mut tx, workload.id, workload.status, elapsed)
        .await
        .map_err(|e| WcpError::ExternalService(e.to_string()))?;
    deps.workload_repo
        .set_status(&mut tx, workload.id, message.status, message.updated_at)
        .await
        .map_err(|e| WcpError::ExternalService(e.to_string()))?;
    tx.commit().await.map_err(|e| WcpError::ExternalService(e.to_string()))?;

    Ok(())
}

async fn apply_component_status<W, C, T>(
    deps: &FeedbackDeps<'_, W, C, T>,
    message: &WorkloadComponentStatusMessage,
) -> Result<(), WcpError>
where
    W: WorkloadRepo,
    C: ComponentRepo,
    T: TimeSummaryRepo,
{
    let kind_str = wcp_store::records::component_kind_to_str(message.kind);
    let existing = deps
        .component_repo
        .get_by_id_kind_version(deps.pool, message.component_id, &kind_str, &message.api_version)
        .await
        .map_err(|e| WcpError::ExternalService(e.to_string()))?;

    let existing = match existing {
        Some(c) => c,
        None => {
            log::warn!(
                "dropping component status update for unknown component {} (kind={:?}, api_version={}): likely a dispatcher-created child",
                message.component_id,
                message.kind,
                message.api_version
            );
            return Ok(());
        }
    };

    if !existing.accepts_event_at(message.updated_at) {
        log::debug!(
            "dropping stale component status update for {} (event={:?} <= stored={:?})",
            message.component_id,
            message.updated_at,
            existing.updated_at
        );
        return Ok(());
    }

    let workload = deps
        .workload_repo
        .get(deps.pool, message.workload_id)
        .await
        .map_err(|e| WcpError::ExternalService(e.to_string()))?
        .ok_or_else(|| WcpError::NotFound(format!("workload {} not found", message.workload_id)))?;

    let mut tx = deps.pool.begin().await.map_err(|e| WcpError::ExternalService(e.to_string()))?;

    let applied = deps
        .component_repo
        .apply_status_if_newer(
            &mut tx,
            message.component_id,
            message.status,
            message.status_reason.as_deref(),
            message.updated_at,
        )
        .await
        .map_err(|e| WcpError::ExternalService(e.to_string()))?;

    if !applied {
        tx.rollback().await.map_err(|e| WcpError::ExternalService(e.to_string()))?;
        return Ok(());
    }

    let mut components = deps
        .component_repo
        .list_for_workload(deps.pool, message.workload_id)
        .await
        .map_err(|e| WcpError::ExternalService(e.to_string()))?;

    // The read above happens outside the still-open transaction's write
    // set from this statement's point of view; patch in the value we
    // just wrote so the resolver sees it even under READ COMMITTED.
    for c in components.iter_mut() {
        if c.id == message.component_id {
            c.status = message.status;
        }
    }

    let views: Vec<ComponentView> = components.iter().map(ComponentView::from).collect();
    let new_status = resolve(workload.status, &views);

    if new_status != workload.status {
        let elapsed = (message.updated_at - workload.last_status_transition_at).num_seconds().max(0);
        deps.time_summary_repo
            .accumulate(&mut tx, workload.id, workload.status, elapsed)
            .await
            .map_err(|e| WcpError::ExternalService(e.to_string()))?;
        deps.workload_repo
            .set_status(&mut tx, workload.id, new_status, message.updated_at)
            .await
            .map_err(|e| WcpError::ExternalService(e.to_string()))?;
    }

    tx.commit().await.map_err(|e| WcpError::ExternalService(e.to_string()))?;

    Ok(())
}

async fn apply_auto_discovered<W, C, T>(
    deps: &FeedbackDeps<'_, W, C, T>,
    message: &AutoDiscoveredWorkloadComponentMessage,
) -> Result<(), WcpError>
where
    W: WorkloadRepo,
    C: ComponentRepo,
    T: TimeSummaryRepo,
{
    let kind_str = wcp_store::records::component_kind_to_str(message.kind);
    let existing = deps
        .component_repo
        .get_by_id_kind_version(deps.pool, message.component_id, &kind_str, &message.api_version)
        .await
        .map_err(|e| WcpError::ExternalService(e.to_string()))?;

    if existing.is_some() {
        return Ok(());
    }

    let now: DateTime<Utc> = Utc::now();
    let component = WorkloadComponent {
        id: message.component_id,
        workload_id: message.workload_id,
        name: message.name.clone(),
        kind: message.kind,
        api_version: message.api_version.clone(),
        status: ComponentStatus::Common(CommonComponentStatus::Registered),
        status_reason: None,
        created_at: now,
        updated_at: now,
    };

    let mut tx = deps.pool.begin().await.map_err(|e| WcpError::ExternalService(e.to_string()))?;
    deps.component_repo
        .insert(&mut tx, &component)
        .await
        .map_err(|e| WcpError::ExternalService(e.to_string()))?;
    tx.commit().await.map_err(|e| WcpError::ExternalService(e.to_string()))?;

    Ok(())
}
