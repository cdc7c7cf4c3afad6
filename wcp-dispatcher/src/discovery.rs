//! Optional-resource probing (SPEC_FULL "ADDED FEATURES"): `HTTPRoute`
//! and `Ingress` watchers only start if the API group is actually
//! installed in the cluster, and `KaiwoJob`/`KaiwoService`/`AIMService`
//! resolve their installed CRD version once at startup rather than
//! assuming a fixed `apiVersion`. The original dispatcher did this via
//! `start_kubernetes_watcher_if_resource_exists` /
//! `get_installed_version_for_custom_resource`; here it's a thin wrapper
//! over `kube::discovery::Discovery`, the idiomatic `kube` replacement
//! for hand-rolled `/apis` probing.

use kube::discovery::Discovery;
use kube::Client;

/// Existence-only probe, for kinds whose group/version is fixed and
/// well-known but whose presence in the cluster isn't guaranteed
/// (`Ingress`/`HTTPRoute`).
pub async fn resource_kind_installed(client: &Client, group: &str, kind: &str) -> anyhow::Result<bool> {
    Ok(installed_version_for(client, group, kind).await?.is_some())
}

pub async fn installed_version_for(client: &Client, group: &str, kind: &str) -> anyhow::Result<Option<String>> {
    let discovery = Discovery::new(client.clone()).run().await?;
    for group_entry in discovery.groups() {
        if group_entry.name() != group {
            continue;
        }
        for (ar, _caps) in group_entry.recommended_resources() {
            if ar.kind == kind {
                return Ok(Some(ar.version));
            }
        }
    }
    Ok(None)
}
