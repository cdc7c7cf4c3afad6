//! Manifest validator and label injector (spec §4.1). Takes a raw
//! multi-document YAML byte stream plus the resolved project/workload
//! context, and produces the list of components to persist plus the
//! transformed manifest to hand to the dispatcher. Validation always
//! runs to completion over every document before any injection happens,
//! so a later document's violation never leaves an earlier one
//! half-mutated in the caller's view.

use serde::Deserialize as _;
use serde_yaml::Value;
use uuid::Uuid;
use wcp_defs::kinds::ComponentKind;
use wcp_defs::WcpError;

use crate::labels::{COMPONENT_ID_LABEL, PROJECT_ID_LABEL, SCHEDULING_QUEUE_LABEL, WORKLOAD_ID_LABEL};

pub const MAX_MANIFEST_BYTES: usize = 2 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct ComponentDescriptor {
    pub id: Uuid,
    pub kind: ComponentKind,
    pub api_version: String,
    pub name: String,
}

/// Public so `wcp-dispatcher` can parse the same wire kind strings back
/// out of an already-injected manifest without re-deriving this table.
pub fn kind_from_wire(s: &str) -> Option<ComponentKind> {
    Some(match s {
        "Deployment" => ComponentKind::Deployment,
        "StatefulSet" => ComponentKind::StatefulSet,
        "DaemonSet" => ComponentKind::DaemonSet,
        "CronJob" => ComponentKind::CronJob,
        "Job" => ComponentKind::Job,
        "Pod" => ComponentKind::Pod,
        "Service" => ComponentKind::Service,
        "ConfigMap" => ComponentKind::ConfigMap,
        "Ingress" => ComponentKind::Ingress,
        "HTTPRoute" => ComponentKind::HttpRoute,
        "KaiwoJob" => ComponentKind::KaiwoJob,
        "KaiwoService" => ComponentKind::KaiwoService,
        "AIMService" => ComponentKind::AimService,
        "ExternalSecret" => ComponentKind::ExternalSecret,
        _ => return None,
    })
}

fn get_str<'a>(v: &'a Value, path: &[&str]) -> Option<&'a str> {
    let mut cur = v;
    for key in path {
        cur = cur.as_mapping()?.get(Value::String((*key).to_string()))?;
    }
    cur.as_str()
}

fn set_nested_label(v: &mut Value, path: &[&str], key: &str, value: &str) {
    let mut cur = v;
    for segment in path {
        if !cur.is_mapping() {
            *cur = Value::Mapping(Default::default());
        }
        let map = cur.as_mapping_mut().unwrap();
        let entry = map
            .entry(Value::String((*segment).to_string()))
            .or_insert_with(|| Value::Mapping(Default::default()));
        cur = entry;
    }
    if !cur.is_mapping() {
        *cur = Value::Mapping(Default::default());
    }
    cur.as_mapping_mut()
        .unwrap()
        .insert(Value::String(key.to_string()), Value::String(value.to_string()));
}

fn has_nested(v: &Value, path: &[&str]) -> bool {
    let mut cur = v;
    for key in path {
        match cur.as_mapping().and_then(|m| m.get(Value::String((*key).to_string()))) {
            Some(next) => cur = next,
            None => return false,
        }
    }
    true
}

pub fn inject_and_validate(
    manifest_bytes: &[u8],
    workload_id: Uuid,
    project_id: Uuid,
    project_name: &str,
) -> Result<(Vec<ComponentDescriptor>, String), WcpError> {
    if manifest_bytes.len() > MAX_MANIFEST_BYTES {
        return Err(WcpError::validation(format!(
            "manifest exceeds {MAX_MANIFEST_BYTES} bytes"
        )));
    }

    let text = std::str::from_utf8(manifest_bytes)
        .map_err(|e| WcpError::validation(format!("manifest is not valid UTF-8: {e}")))?;

    let mut docs: Vec<Value> = Vec::new();
    for parsed in serde_yaml::Deserializer::from_str(text) {
        let value = Value::deserialize(parsed).map_err(|e| WcpError::validation(format!("invalid YAML: {e}")))?;
        docs.push(value);
    }

    if docs.is_empty() {
        return Err(WcpError::validation("manifest contains zero documents"));
    }

    // Pass 1: validate every document before mutating any of them.
    for doc in &docs {
        let kind_str = get_str(doc, &["kind"]).ok_or_else(|| WcpError::validation("document missing `kind`"))?;
        let kind = kind_from_wire(kind_str)
            .ok_or_else(|| WcpError::validation(format!("unsupported kind `{kind_str}`")))?;

        // ExternalSecret never appears in the dispatcher's native-status
        // tables (original_source's constants.py has no entry for it in
        // any completed/failed/pending/running set), and secrets
        // provisioning is listed as an external collaborator (spec §1/§6).
        // A submitted ExternalSecret would sit at REGISTERED forever and
        // leak on delete, so it's rejected here rather than silently
        // accepted and applied.
        if kind == ComponentKind::ExternalSecret {
            return Err(WcpError::validation(
                "ExternalSecret is not a submittable component kind: secrets provisioning is handled out of band",
            ));
        }

        if get_str(doc, &["metadata", "name"]).is_none() {
            return Err(WcpError::validation("document missing `metadata.name`"));
        }

        if has_nested(doc, &["metadata", "namespace"]) {
            return Err(WcpError::validation("document must not set `metadata.namespace`"));
        }

        let sa_path: &[&str] = if kind.is_kaiwo() {
            &["spec", "serviceAccountName"]
        } else {
            &["spec", "template", "spec", "serviceAccountName"]
        };
        if matches!(
            kind,
            ComponentKind::Deployment | ComponentKind::Job | ComponentKind::KaiwoJob | ComponentKind::KaiwoService
        ) && has_nested(doc, sa_path)
        {
            return Err(WcpError::validation(format!(
                "document of kind `{kind_str}` must not set serviceAccountName"
            )));
        }
    }

    // Pass 2: inject, now that nothing will fail partway through.
    let mut descriptors = Vec::with_capacity(docs.len());
    for doc in docs.iter_mut() {
        let kind_str = get_str(doc, &["kind"]).unwrap().to_string();
        let kind = kind_from_wire(&kind_str).unwrap();
        let name = get_str(doc, &["metadata", "name"]).unwrap().to_string();
        let api_version = get_str(doc, &["apiVersion"]).unwrap_or("v1").to_string();
        let component_id = Uuid::new_v4();

        doc.as_mapping_mut()
            .unwrap()
            .get_mut(Value::String("metadata".into()))
            .unwrap()
            .as_mapping_mut()
            .unwrap()
            .insert(Value::String("namespace".into()), Value::String(project_name.to_string()));

        let wid = workload_id.to_string();
        let cid = component_id.to_string();
        let pid = project_id.to_string();

        if kind.is_kaiwo() {
            set_nested_label(doc, &["metadata", "labels"], WORKLOAD_ID_LABEL, &wid);
            set_nested_label(doc, &["metadata", "labels"], COMPONENT_ID_LABEL, &cid);
            set_nested_label(doc, &["metadata", "labels"], PROJECT_ID_LABEL, &pid);
            set_nested_label(doc, &["spec"], "clusterQueue", project_name);
        } else if kind == ComponentKind::DaemonSet {
            let tmpl = ["spec", "template", "metadata", "labels"];
            set_nested_label(doc, &tmpl, WORKLOAD_ID_LABEL, &wid);
            set_nested_label(doc, &tmpl, COMPONENT_ID_LABEL, &cid);
            set_nested_label(doc, &tmpl, PROJECT_ID_LABEL, &pid);
            set_nested_label(doc, &tmpl, SCHEDULING_QUEUE_LABEL, project_name);
        } else if kind == ComponentKind::CronJob {
            set_nested_label(doc, &["metadata", "labels"], WORKLOAD_ID_LABEL, &wid);
            set_nested_label(doc, &["metadata", "labels"], COMPONENT_ID_LABEL, &cid);
            set_nested_label(doc, &["metadata", "labels"], PROJECT_ID_LABEL, &pid);

            let job_tmpl_meta = ["spec", "jobTemplate", "metadata"];
            set_nested_label(doc, &job_tmpl_meta, WORKLOAD_ID_LABEL, &wid);
            set_nested_label(doc, &job_tmpl_meta, COMPONENT_ID_LABEL, &cid);
            set_nested_label(doc, &job_tmpl_meta, PROJECT_ID_LABEL, &pid);
            set_nested_label(doc, &job_tmpl_meta, SCHEDULING_QUEUE_LABEL, project_name);

            let pod_tmpl_meta = ["spec", "jobTemplate", "spec", "template", "metadata"];
            set_nested_label(doc, &pod_tmpl_meta, WORKLOAD_ID_LABEL, &wid);
            set_nested_label(doc, &pod_tmpl_meta, COMPONENT_ID_LABEL, &cid);
            set_nested_label(doc, &pod_tmpl_meta, PROJECT_ID_LABEL, &pid);
        } else {
            set_nested_label(doc, &["metadata", "labels"], WORKLOAD_ID_LABEL, &wid);
            set_nested_label(doc, &["metadata", "labels"], COMPONENT_ID_LABEL, &cid);
            set_nested_label(doc, &["metadata", "labels"], PROJECT_ID_LABEL, &pid);
            if kind.requires_scheduling_queue_label() {
                set_nested_label(doc, &["metadata", "labels"], SCHEDULING_QUEUE_LABEL, project_name);
            }
            if kind.has_pod_template() {
                let tmpl = ["spec", "template", "metadata", "labels"];
                set_nested_label(doc, &tmpl, WORKLOAD_ID_LABEL, &wid);
                set_nested_label(doc, &tmpl, COMPONENT_ID_LABEL, &cid);
                set_nested_label(doc, &tmpl, PROJECT_ID_LABEL, &pid);
                if kind.requires_scheduling_queue_label() {
                    set_nested_label(doc, &tmpl, SCHEDULING_QUEUE_LABEL, project_name);
                }
            }
        }

        descriptors.push(ComponentDescriptor { id: component_id, kind, api_version, name });
    }

    let rendered = docs
        .iter()
        .map(|d| serde_yaml::to_string(d).map_err(|e| WcpError::validation(format!("re-serialization failed: {e}"))))
        .collect::<Result<Vec<_>, _>>()?
        .join("---\n");

    Ok((descriptors, rendered))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn wid() -> Uuid {
        Uuid::new_v4()
    }

    #[test]
    fn rejects_empty_manifest() {
        let err = inject_and_validate(b"", wid(), wid(), "proj").unwrap_err();
        assert!(matches!(err, WcpError::Validation(_)));
    }

    #[test]
    fn rejects_namespace_set() {
        let yaml = "kind: Deployment\nmetadata:\n  name: x\n  namespace: foo\n";
        let err = inject_and_validate(yaml.as_bytes(), wid(), wid(), "proj").unwrap_err();
        assert!(matches!(err, WcpError::Validation(_)));
    }

    #[test]
    fn rejects_unknown_kind() {
        let yaml = "kind: Widget\nmetadata:\n  name: x\n";
        let err = inject_and_validate(yaml.as_bytes(), wid(), wid(), "proj").unwrap_err();
        assert!(matches!(err, WcpError::Validation(_)));
    }

    #[test]
    fn rejects_external_secret() {
        let yaml = "kind: ExternalSecret\nmetadata:\n  name: x\n";
        let err = inject_and_validate(yaml.as_bytes(), wid(), wid(), "proj").unwrap_err();
        assert!(matches!(err, WcpError::Validation(_)));
    }

    #[test]
    fn rejects_service_account_name_on_deployment() {
        let yaml = "kind: Deployment\nmetadata:\n  name: x\nspec:\n  template:\n    spec:\n      serviceAccountName: sneaky\n";
        let err = inject_and_validate(yaml.as_bytes(), wid(), wid(), "proj").unwrap_err();
        assert!(matches!(err, WcpError::Validation(_)));
    }

    #[test]
    fn injects_labels_and_namespace_for_deployment() {
        let yaml = "kind: Deployment\nmetadata:\n  name: x\nspec:\n  template:\n    metadata: {}\n";
        let workload_id = wid();
        let project_id = wid();
        let (descriptors, rendered) = inject_and_validate(yaml.as_bytes(), workload_id, project_id, "proj-a").unwrap();
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].kind, ComponentKind::Deployment);
        assert!(rendered.contains("proj-a"));
        assert!(rendered.contains(WORKLOAD_ID_LABEL));
        assert!(rendered.contains(SCHEDULING_QUEUE_LABEL));
    }

    #[test]
    fn preserves_document_order() {
        let yaml = "kind: ConfigMap\nmetadata:\n  name: cfg\n---\nkind: Deployment\nmetadata:\n  name: dep\n";
        let (descriptors, _) = inject_and_validate(yaml.as_bytes(), wid(), wid(), "proj").unwrap();
        assert_eq!(descriptors[0].name, "cfg");
        assert_eq!(descriptors[1].name, "dep");
    }
}
