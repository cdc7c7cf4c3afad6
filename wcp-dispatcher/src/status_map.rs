//! Per-kind native status derivation (spec §4.6): a pure function over a
//! watched resource's `status` (and occasionally `spec`) sub-object. The
//! Python dispatcher's equivalent table (`get_status_for_*`) lived outside
//! the filtered source pack; the mapping below follows spec §4.6's own
//! examples (Job from `.status.conditions[]`/`.succeeded`/`.failed`,
//! KaiwoJob as a straight passthrough of `.status.status`) and the
//! completed/running/pending/failed partitions of §4.4's table.

use kube::api::DynamicObject;
use serde_json::Value;
use wcp_defs::kinds::{
    AimServiceStatus, ComponentKind, ComponentStatus, ConfigMapStatus, CronJobStatus, DaemonSetStatus,
    DeploymentStatus, HttpRouteStatus, IngressStatus, JobStatus, KaiwoJobStatus, KaiwoServiceStatus, NativeStatus,
    PodStatus, ServiceStatus, StatefulSetStatus,
};

fn status_obj(resource: &DynamicObject) -> Option<&Value> {
    resource.data.get("status")
}

fn spec_obj(resource: &DynamicObject) -> Option<&Value> {
    resource.data.get("spec")
}

fn job_conditions_has(status: &Value, cond_type: &str) -> bool {
    status
        .get("conditions")
        .and_then(Value::as_array)
        .map(|conds| {
            conds.iter().any(|c| {
                c.get("type").and_then(Value::as_str) == Some(cond_type)
                    && c.get("status").and_then(Value::as_str) == Some("True")
            })
        })
        .unwrap_or(false)
}

fn job_status(resource: &DynamicObject) -> (JobStatus, &'static str) {
    let suspended = spec_obj(resource).and_then(|s| s.get("suspend")).and_then(Value::as_bool).unwrap_or(false);
    let Some(status) = status_obj(resource) else {
        return if suspended { (JobStatus::Suspended, "Job is suspended") } else { (JobStatus::Pending, "Job has no status yet") };
    };
    if job_conditions_has(status, "Complete") {
        (JobStatus::Complete, "Job completed")
    } else if job_conditions_has(status, "Failed") {
        (JobStatus::Failed, "Job failed")
    } else if suspended {
        (JobStatus::Suspended, "Job is suspended")
    } else if status.get("active").and_then(Value::as_i64).unwrap_or(0) > 0 {
        (JobStatus::Running, "Job has active pods")
    } else {
        (JobStatus::Pending, "Job is pending")
    }
}

fn deployment_status(resource: &DynamicObject) -> (DeploymentStatus, &'static str) {
    let available = status_obj(resource)
        .and_then(|s| s.get("conditions"))
        .and_then(Value::as_array)
        .map(|conds| {
            conds.iter().any(|c| {
                c.get("type").and_then(Value::as_str) == Some("Available")
                    && c.get("status").and_then(Value::as_str) == Some("True")
            })
        })
        .unwrap_or(false);
    if available {
        (DeploymentStatus::Running, "Deployment has available replicas")
    } else {
        (DeploymentStatus::Pending, "Deployment has no available replicas yet")
    }
}

fn pod_status(resource: &DynamicObject) -> (PodStatus, &'static str) {
    match status_obj(resource).and_then(|s| s.get("phase")).and_then(Value::as_str) {
        Some("Succeeded") => (PodStatus::Complete, "Pod succeeded"),
        Some("Failed") => (PodStatus::Failed, "Pod failed"),
        Some("Running") => (PodStatus::Running, "Pod is running"),
        _ => (PodStatus::Pending, "Pod is pending"),
    }
}

fn service_status(resource: &DynamicObject) -> (ServiceStatus, &'static str) {
    let lb_type = spec_obj(resource).and_then(|s| s.get("type")).and_then(Value::as_str).unwrap_or("ClusterIP");
    if lb_type != "LoadBalancer" {
        return (ServiceStatus::Ready, "Service does not require load-balancer provisioning");
    }
    let has_ingress = status_obj(resource)
        .and_then(|s| s.get("loadBalancer"))
        .and_then(|lb| lb.get("ingress"))
        .and_then(Value::as_array)
        .map(|a| !a.is_empty())
        .unwrap_or(false);
    if has_ingress {
        (ServiceStatus::Ready, "Load balancer has been provisioned")
    } else {
        (ServiceStatus::Pending, "Waiting for load balancer to be provisioned")
    }
}

fn replica_backed_status(resource: &DynamicObject) -> (bool, &'static str) {
    let desired = spec_obj(resource).and_then(|s| s.get("replicas")).and_then(Value::as_i64).unwrap_or(1);
    let ready = status_obj(resource)
        .and_then(|s| s.get("readyReplicas").or_else(|| s.get("numberReady")))
        .and_then(Value::as_i64)
        .unwrap_or(0);
    (ready >= desired && desired > 0, "replica readiness")
}

fn cronjob_status(resource: &DynamicObject) -> (CronJobStatus, &'static str) {
    let suspended = spec_obj(resource).and_then(|s| s.get("suspend")).and_then(Value::as_bool).unwrap_or(false);
    if suspended {
        return (CronJobStatus::Suspended, "CronJob is suspended");
    }
    let has_active =
        status_obj(resource).and_then(|s| s.get("active")).and_then(Value::as_array).map(|a| !a.is_empty()).unwrap_or(false);
    if has_active {
        (CronJobStatus::Running, "CronJob has an active run")
    } else {
        (CronJobStatus::Ready, "CronJob is scheduled and idle")
    }
}

fn kaiwo_job_status(resource: &DynamicObject) -> Option<(KaiwoJobStatus, String)> {
    let s = status_obj(resource)?.get("status")?.as_str()?;
    let status = match s {
        "PENDING" => KaiwoJobStatus::Pending,
        "ERROR" => KaiwoJobStatus::Error,
        "STARTING" => KaiwoJobStatus::Starting,
        "TERMINATING" => KaiwoJobStatus::Terminating,
        "DOWNLOADING" => KaiwoJobStatus::Downloading,
        "RUNNING" => KaiwoJobStatus::Running,
        "COMPLETE" => KaiwoJobStatus::Complete,
        "FAILED" => KaiwoJobStatus::Failed,
        "TERMINATED" => KaiwoJobStatus::Terminated,
        _ => return None,
    };
    Some((status, format!("KaiwoJob status is {s}")))
}

fn kaiwo_service_status(resource: &DynamicObject) -> Option<(KaiwoServiceStatus, String)> {
    let s = status_obj(resource)?.get("status")?.as_str()?;
    let status = match s {
        "PENDING" => KaiwoServiceStatus::Pending,
        "ERROR" => KaiwoServiceStatus::Error,
        "STARTING" => KaiwoServiceStatus::Starting,
        "TERMINATING" => KaiwoServiceStatus::Terminating,
        "DOWNLOADING" => KaiwoServiceStatus::Downloading,
        "RUNNING" => KaiwoServiceStatus::Running,
        "COMPLETE" => KaiwoServiceStatus::Complete,
        "FAILED" => KaiwoServiceStatus::Failed,
        "TERMINATED" => KaiwoServiceStatus::Terminated,
        _ => return None,
    };
    Some((status, format!("KaiwoService status is {s}")))
}

fn aim_service_status(resource: &DynamicObject) -> Option<(AimServiceStatus, String)> {
    let s = status_obj(resource)?.get("status")?.as_str()?;
    let status = match s {
        "PENDING" => AimServiceStatus::Pending,
        "STARTING" => AimServiceStatus::Starting,
        "DEGRADED" => AimServiceStatus::Degraded,
        "RUNNING" => AimServiceStatus::Running,
        "FAILED" => AimServiceStatus::Failed,
        _ => return None,
    };
    Some((status, format!("AIMService status is {s}")))
}

/// `None` means the kind is never watched for native status (currently
/// only `ExternalSecret`, which `wcp-utils::manifest::inject_and_validate`
/// already rejects at submission time — it never reaches the dispatcher,
/// so no `NativeStatus` variant exists for it).
pub fn native_status_for(kind: ComponentKind, resource: &DynamicObject) -> Option<(ComponentStatus, String)> {
    let (native, reason) = match kind {
        ComponentKind::Job => {
            let (s, r) = job_status(resource);
            (NativeStatus::Job(s), r.to_string())
        }
        ComponentKind::Deployment => {
            let (s, r) = deployment_status(resource);
            (NativeStatus::Deployment(s), r.to_string())
        }
        ComponentKind::Pod => {
            let (s, r) = pod_status(resource);
            (NativeStatus::Pod(s), r.to_string())
        }
        ComponentKind::Service => {
            let (s, r) = service_status(resource);
            (NativeStatus::Service(s), r.to_string())
        }
        ComponentKind::ConfigMap => (NativeStatus::ConfigMap(ConfigMapStatus::Added), "ConfigMap observed".to_string()),
        ComponentKind::Ingress => (NativeStatus::Ingress(IngressStatus::Added), "Ingress observed".to_string()),
        ComponentKind::HttpRoute => (NativeStatus::HttpRoute(HttpRouteStatus::Added), "HTTPRoute observed".to_string()),
        ComponentKind::StatefulSet => {
            let (ready, r) = replica_backed_status(resource);
            (NativeStatus::StatefulSet(if ready { StatefulSetStatus::Running } else { StatefulSetStatus::Pending }), r.to_string())
        }
        ComponentKind::DaemonSet => {
            let (ready, r) = replica_backed_status(resource);
            (NativeStatus::DaemonSet(if ready { DaemonSetStatus::Running } else { DaemonSetStatus::Pending }), r.to_string())
        }
        ComponentKind::CronJob => {
            let (s, r) = cronjob_status(resource);
            (NativeStatus::CronJob(s), r.to_string())
        }
        ComponentKind::KaiwoJob => {
            let (s, r) = kaiwo_job_status(resource)?;
            (NativeStatus::KaiwoJob(s), r)
        }
        ComponentKind::KaiwoService => {
            let (s, r) = kaiwo_service_status(resource)?;
            (NativeStatus::KaiwoService(s), r)
        }
        ComponentKind::AimService => {
            let (s, r) = aim_service_status(resource)?;
            (NativeStatus::AimService(s), r)
        }
        ComponentKind::ExternalSecret => return None,
    };
    Some((ComponentStatus::Native(native), reason))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::api::ObjectMeta;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn dynamic_with(status: Value) -> DynamicObject {
        DynamicObject {
            types: None,
            metadata: ObjectMeta::default(),
            data: json!({ "status": status }),
        }
    }

    #[test]
    fn job_reports_complete_from_condition() {
        let obj = dynamic_with(json!({ "conditions": [{ "type": "Complete", "status": "True" }] }));
        let (status, _) = native_status_for(ComponentKind::Job, &obj).unwrap();
        assert_eq!(status, ComponentStatus::Native(NativeStatus::Job(JobStatus::Complete)));
    }

    #[test]
    fn kaiwo_job_passes_through_status_field() {
        let obj = dynamic_with(json!({ "status": "DOWNLOADING" }));
        let (status, _) = native_status_for(ComponentKind::KaiwoJob, &obj).unwrap();
        assert_eq!(status, ComponentStatus::Native(NativeStatus::KaiwoJob(KaiwoJobStatus::Downloading)));
    }

    #[test]
    fn external_secret_has_no_native_status() {
        let obj = dynamic_with(json!({}));
        assert!(native_status_for(ComponentKind::ExternalSecret, &obj).is_none());
    }
}
