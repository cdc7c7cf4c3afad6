//! Dispatcher queue consumer + applier (spec §4.5), grounded in
//! `operator/src/apply.rs`'s `Patch::Apply` + forced-apply call style and
//! `operator/src/operator.rs`'s `handle_resource_apply`/
//! `handle_resource_deletion`, generalized from the teacher's single
//! `infraweave.io` CRD group to the closed kind set of spec §3 and from
//! finalizer-driven deletion to the explicit `DeleteWorkloadMessage` this
//! system uses instead.

use chrono::Utc;
use kube::api::{Api, DeleteParams, DynamicObject, ListParams, Patch, PatchParams, PropagationPolicy};
use kube::Client;
use serde::Deserialize as _;
use serde_yaml::Value as YamlValue;
use uuid::Uuid;
use wcp_defs::kinds::{CommonComponentStatus, ComponentStatus};
use wcp_defs::messages::{DeleteWorkloadMessage, WorkloadComponentStatusMessage, WorkloadMessage, WorkloadStatusMessage};
use wcp_defs::model::WorkloadStatus;
use wcp_queue::Bus;
use wcp_utils::labels::{COMPONENT_ID_LABEL, WORKLOAD_ID_LABEL};
use wcp_utils::manifest::kind_from_wire;

use crate::discovery;
use crate::gvk;

const FIELD_MANAGER: &str = "wcp-dispatcher";

fn yaml_get_str<'a>(v: &'a YamlValue, path: &[&str]) -> Option<&'a str> {
    let mut cur = v;
    for key in path {
        cur = cur.as_mapping()?.get(YamlValue::String((*key).to_string()))?;
    }
    cur.as_str()
}

async fn publish_component_status(
    bus: &Bus,
    queue: &str,
    workload_id: Uuid,
    component_id: Uuid,
    kind: wcp_defs::kinds::ComponentKind,
    api_version: String,
    name: String,
    status: ComponentStatus,
    status_reason: Option<String>,
) -> anyhow::Result<()> {
    let msg = wcp_defs::BusMessage::WorkloadComponentStatusUpdate(WorkloadComponentStatusMessage {
        workload_id,
        component_id,
        kind,
        api_version,
        name,
        status,
        status_reason,
        updated_at: Utc::now(),
    });
    bus.publish(queue, &msg).await
}

/// Behavior on `WorkloadMessage` (spec §4.5): apply every document in the
/// manifest; a failure on one document is reported as a `CREATE_FAILED`
/// component status and does not abort the rest.
pub async fn apply_workload(client: &Client, bus: &Bus, feedback_queue: &str, msg: &WorkloadMessage) -> anyhow::Result<()> {
    for document in serde_yaml::Deserializer::from_str(&msg.manifest) {
        let doc = match YamlValue::deserialize(document) {
            Ok(d) => d,
            Err(e) => {
                log::error!("workload {}: failed to parse manifest document: {e}", msg.workload_id);
                continue;
            }
        };

        let kind_str = yaml_get_str(&doc, &["kind"]).unwrap_or_default().to_string();
        let api_version = yaml_get_str(&doc, &["apiVersion"]).unwrap_or("v1").to_string();
        let name = yaml_get_str(&doc, &["metadata", "name"]).unwrap_or_default().to_string();
        let namespace = yaml_get_str(&doc, &["metadata", "namespace"]).unwrap_or("default").to_string();
        let component_id = yaml_get_str(&doc, &["metadata", "labels", COMPONENT_ID_LABEL]).and_then(|s| s.parse::<Uuid>().ok());

        let result = apply_single_document(client, &doc, &kind_str, &api_version, &namespace).await;

        if let Err(e) = result {
            log::error!("workload {}: failed to apply {kind_str}/{name}: {e}", msg.workload_id);
            let Some(component_id) = component_id else {
                log::error!("workload {}: cannot report CREATE_FAILED, document carries no component-id label", msg.workload_id);
                continue;
            };
            let Some(kind) = kind_from_wire(&kind_str) else { continue };
            publish_component_status(
                bus,
                feedback_queue,
                msg.workload_id,
                component_id,
                kind,
                api_version,
                name,
                ComponentStatus::Common(CommonComponentStatus::CreateFailed),
                Some(e.to_string()),
            )
            .await?;
        }
    }
    Ok(())
}

async fn apply_single_document(client: &Client, doc: &YamlValue, kind_str: &str, api_version: &str, namespace: &str) -> anyhow::Result<()> {
    let kind = kind_from_wire(kind_str).ok_or_else(|| anyhow::anyhow!("unsupported kind `{kind_str}`"))?;
    let api_resource = gvk::api_resource_from_manifest(kind, api_version);
    let json_doc: serde_json::Value = serde_json::to_value(doc)?;
    let name = json_doc
        .get("metadata")
        .and_then(|m| m.get("name"))
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| anyhow::anyhow!("document missing metadata.name"))?
        .to_string();

    let api = Api::<DynamicObject>::namespaced_with(client.clone(), namespace, &api_resource);
    let params = PatchParams::apply(FIELD_MANAGER).force();
    let patch = Patch::Apply(json_doc);
    api.patch(&name, &params, &patch).await?;
    Ok(())
}

/// Behavior on `DeleteWorkloadMessage` (spec §4.5): list every supported
/// kind, labelled `workload-id=<id>`, across every namespace. No matches
/// at all (including kinds that don't exist in this cluster) yields a
/// direct `WorkloadStatusMessage{DELETED}` with no component messages.
/// Otherwise each match is deleted with foreground propagation; a
/// per-item delete failure is reported as `DELETE_FAILED` and does not
/// abort the remaining items.
pub async fn delete_workload(client: &Client, bus: &Bus, feedback_queue: &str, msg: &DeleteWorkloadMessage) -> anyhow::Result<()> {
    let label_selector = format!("{WORKLOAD_ID_LABEL}={}", msg.workload_id);
    let mut any_found = false;

    for &kind in gvk::ALL_KINDS {
        let api_resource = match resolve_kind_api_resource(client, kind).await {
            Some(ar) => ar,
            None => continue,
        };

        let api = Api::<DynamicObject>::all_with(client.clone(), &api_resource);
        let items = match api.list(&ListParams::default().labels(&label_selector)).await {
            Ok(list) => list.items,
            Err(e) => {
                log::warn!("listing {} failed, skipping for this delete: {e}", gvk::kind_name(kind));
                continue;
            }
        };

        for item in items {
            any_found = true;
            delete_one(client, &api_resource, &item, bus, feedback_queue, msg.workload_id, kind).await?;
        }
    }

    if !any_found {
        let status_msg = wcp_defs::BusMessage::WorkloadStatus(WorkloadStatusMessage {
            workload_id: msg.workload_id,
            status: WorkloadStatus::Deleted,
            status_reason: Some(format!("no resources found for deletion: {WORKLOAD_ID_LABEL}={}", msg.workload_id)),
            updated_at: Utc::now(),
        });
        bus.publish(feedback_queue, &status_msg).await?;
    }

    Ok(())
}

async fn resolve_kind_api_resource(client: &Client, kind: wcp_defs::kinds::ComponentKind) -> Option<kube::api::ApiResource> {
    // ExternalSecret is rejected at submission (`inject_and_validate`), so
    // no workload ever has a live ExternalSecret to list or delete here.
    if kind == wcp_defs::kinds::ComponentKind::ExternalSecret {
        return None;
    }
    if let Some((_, version, _)) = gvk::fixed_gvk(kind) {
        return Some(gvk::api_resource(kind, version));
    }
    if let Some((group, version, _)) = gvk::optional_gvk(kind) {
        let installed = discovery::resource_kind_installed(client, group, gvk::kind_name(kind)).await.ok()?;
        return installed.then(|| gvk::api_resource(kind, version));
    }
    let group = gvk::group_for(kind);
    let version = discovery::installed_version_for(client, group, gvk::kind_name(kind)).await.ok().flatten()?;
    Some(gvk::api_resource(kind, &version))
}

async fn delete_one(
    client: &Client,
    api_resource: &kube::api::ApiResource,
    item: &DynamicObject,
    bus: &Bus,
    feedback_queue: &str,
    workload_id: Uuid,
    kind: wcp_defs::kinds::ComponentKind,
) -> anyhow::Result<()> {
    let namespace = item.metadata.namespace.clone().unwrap_or_else(|| "default".to_string());
    let name = item.metadata.name.clone().unwrap_or_default();
    let api = Api::<DynamicObject>::namespaced_with(client.clone(), &namespace, api_resource);

    let delete_params = DeleteParams { propagation_policy: Some(PropagationPolicy::Foreground), ..Default::default() };
    if let Err(e) = api.delete(&name, &delete_params).await {
        let labels = &item.metadata.labels;
        let component_id = labels
            .as_ref()
            .and_then(|l| l.get(COMPONENT_ID_LABEL))
            .and_then(|s| s.parse::<Uuid>().ok());
        let Some(component_id) = component_id else {
            log::error!("delete of {name} failed and it carries no component-id label, dropping: {e}");
            return Ok(());
        };
        publish_component_status(
            bus,
            feedback_queue,
            workload_id,
            component_id,
            kind,
            api_resource.api_version.clone(),
            name,
            ComponentStatus::Common(CommonComponentStatus::DeleteFailed),
            Some(format!("deletion failed: {e}")),
        )
        .await?;
    }
    Ok(())
}
