//! Resource watchers and auto-discovery (spec §4.6), grounded in
//! `operator/src/operator.rs::start_infraweave_watcher` /
//! `watch_all_infraweave_resources_unified` (per-kind `tokio::spawn`,
//! `kube::runtime::watcher` with exponential-backoff restart on error),
//! generalized from the teacher's single unified CRD watch to one task
//! per kind in the closed set, each publishing directly instead of
//! calling out to a cloud handler.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::StreamExt;
use kube::api::{ApiResource, DynamicObject};
use kube::runtime::watcher;
use kube::{Api, Client};
use uuid::Uuid;
use wcp_defs::kinds::{CommonComponentStatus, ComponentKind, ComponentStatus};
use wcp_defs::messages::{AutoDiscoveredWorkloadComponentMessage, WorkloadComponentStatusMessage};
use wcp_defs::BusMessage;
use wcp_queue::{Bus, FEEDBACK_QUEUE};
use wcp_utils::labels::{
    AUTO_DISCOVERED_WORKLOAD_ANNOTATION, COMPONENT_ID_LABEL, PROJECT_ID_LABEL, WORKLOAD_ID_LABEL, WORKLOAD_SUBMITTER_ANNOTATION,
};

use crate::discovery;
use crate::gvk;
use crate::status_map;

/// Starts one watcher per always-present native kind, the generic
/// ConfigMap watcher, and the optionally-installed kinds (probed once at
/// startup, per SPEC_FULL's "ADDED FEATURES").
pub async fn start_all(client: Client, bus: Arc<Bus>) {
    for &kind in gvk::ALL_KINDS {
        // ConfigMap gets its own dedicated entry point below. ExternalSecret
        // is rejected at submission (`inject_and_validate`) and never has a
        // live resource to watch.
        if kind == ComponentKind::ConfigMap || kind == ComponentKind::ExternalSecret {
            continue;
        }
        if let Some((_, version, _)) = gvk::fixed_gvk(kind) {
            spawn_kind_watcher(client.clone(), bus.clone(), kind, gvk::api_resource(kind, version));
            continue;
        }

        // Ingress/HTTPRoute: fixed group/version, but only watched if
        // the API group is actually installed in this cluster.
        if let Some((group, version, _)) = gvk::optional_gvk(kind) {
            match discovery::resource_kind_installed(&client, group, gvk::kind_name(kind)).await {
                Ok(true) => spawn_kind_watcher(client.clone(), bus.clone(), kind, gvk::api_resource(kind, version)),
                Ok(false) => log::info!("{} is not installed in this cluster, skipping its watcher", gvk::kind_name(kind)),
                Err(e) => log::warn!("failed to probe {} installation: {e}", gvk::kind_name(kind)),
            }
            continue;
        }

        // Kaiwo*/AIMService: resolve the installed CRD version once;
        // skip entirely if the group isn't installed in this cluster.
        let group = gvk::group_for(kind);
        match discovery::installed_version_for(&client, group, gvk::kind_name(kind)).await {
            Ok(Some(version)) => spawn_kind_watcher(client.clone(), bus.clone(), kind, gvk::api_resource(kind, &version)),
            Ok(None) => log::info!("{} is not installed in this cluster, skipping its watcher", gvk::kind_name(kind)),
            Err(e) => log::warn!("failed to probe {} installation: {e}", gvk::kind_name(kind)),
        }
    }

    start_configmap_watcher(client, bus);
}

/// The original dispatcher runs ConfigMaps through their own dedicated
/// watcher code path rather than the generic per-kind one (SPEC_FULL
/// "ADDED FEATURES"); kept as its own entry point here even though the
/// body is identical, to mirror that separation.
pub fn start_configmap_watcher(client: Client, bus: Arc<Bus>) {
    let (_, version, _) = gvk::fixed_gvk(ComponentKind::ConfigMap).expect("ConfigMap has a fixed GVK");
    spawn_kind_watcher(client, bus, ComponentKind::ConfigMap, gvk::api_resource(ComponentKind::ConfigMap, version));
}

fn spawn_kind_watcher(client: Client, bus: Arc<Bus>, kind: ComponentKind, api_resource: ApiResource) {
    tokio::spawn(async move {
        let mut restart_count = 0u32;
        loop {
            restart_count += 1;
            match watch_kind_once(&client, &bus, kind, &api_resource).await {
                Ok(()) => {
                    log::info!("{} watcher terminated normally", gvk::kind_name(kind));
                    break;
                }
                Err(e) => {
                    let backoff_seconds = std::cmp::min(2u64.pow(restart_count.min(5)), 60);
                    log::warn!(
                        "{} watcher failed (attempt #{restart_count}): {e}. Restarting in {backoff_seconds}s...",
                        gvk::kind_name(kind)
                    );
                    tokio::time::sleep(Duration::from_secs(backoff_seconds)).await;
                }
            }
        }
    });
}

async fn watch_kind_once(client: &Client, bus: &Bus, kind: ComponentKind, api_resource: &ApiResource) -> anyhow::Result<()> {
    let api = Api::<DynamicObject>::all_with(client.clone(), api_resource);
    let mut stream = watcher(api, watcher::Config::default()).boxed();

    while let Some(event) = stream.next().await {
        match event? {
            watcher::Event::Apply(resource) => handle_event(bus, kind, api_resource, resource, false).await?,
            watcher::Event::Delete(resource) => handle_event(bus, kind, api_resource, resource, true).await?,
            watcher::Event::Init | watcher::Event::InitDone | watcher::Event::InitApply(_) => {}
        }
    }
    Ok(())
}

async fn handle_event(bus: &Bus, kind: ComponentKind, api_resource: &ApiResource, resource: DynamicObject, deleted: bool) -> anyhow::Result<()> {
    let labels = resource.metadata.labels.clone().unwrap_or_default();
    let Some(workload_id) = labels.get(WORKLOAD_ID_LABEL).and_then(|s| s.parse::<Uuid>().ok()) else {
        return Ok(());
    };
    let Some(component_id) = labels.get(COMPONENT_ID_LABEL).and_then(|s| s.parse::<Uuid>().ok()) else {
        return Ok(());
    };
    let name = resource.metadata.name.clone().unwrap_or_default();

    let annotations = resource.metadata.annotations.clone().unwrap_or_default();
    if annotations.contains_key(AUTO_DISCOVERED_WORKLOAD_ANNOTATION) {
        let project_id = labels.get(PROJECT_ID_LABEL).and_then(|s| s.parse::<Uuid>().ok());
        if let Some(project_id) = project_id {
            publish_auto_discovered(bus, workload_id, component_id, project_id, kind, api_resource.api_version.clone(), name.clone(), annotations.get(WORKLOAD_SUBMITTER_ANNOTATION).cloned()).await?;
        }
    }

    let (status, reason) = if deleted {
        (ComponentStatus::Common(CommonComponentStatus::Deleted), "resource deleted".to_string())
    } else {
        match status_map::native_status_for(kind, &resource) {
            Some(v) => v,
            None => return Ok(()),
        }
    };

    let msg = BusMessage::WorkloadComponentStatusUpdate(WorkloadComponentStatusMessage {
        workload_id,
        component_id,
        kind,
        api_version: api_resource.api_version.clone(),
        name,
        status,
        status_reason: Some(reason),
        updated_at: Utc::now(),
    });
    bus.publish(FEEDBACK_QUEUE, &msg).await
}

#[allow(clippy::too_many_arguments)]
async fn publish_auto_discovered(
    bus: &Bus,
    workload_id: Uuid,
    component_id: Uuid,
    project_id: Uuid,
    kind: ComponentKind,
    api_version: String,
    name: String,
    submitter: Option<String>,
) -> anyhow::Result<()> {
    let msg = BusMessage::AutoDiscoveredWorkloadComponent(AutoDiscoveredWorkloadComponentMessage {
        workload_id,
        component_id,
        project_id,
        kind,
        api_version,
        name,
        submitter,
    });
    bus.publish(FEEDBACK_QUEUE, &msg).await
}
