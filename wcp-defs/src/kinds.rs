//! Closed set of Kubernetes resource kinds the control plane understands,
//! and their native status enums. Every variant below exists because it is
//! named in spec §3/§4.4; nothing here is speculative.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum ComponentKind {
    Deployment,
    StatefulSet,
    DaemonSet,
    CronJob,
    Job,
    Pod,
    Service,
    ConfigMap,
    Ingress,
    HttpRoute,
    KaiwoJob,
    KaiwoService,
    AimService,
    ExternalSecret,
}

impl ComponentKind {
    /// Kubernetes `apiVersion` group used for discovery purposes, where the
    /// kind is not a core/apps built-in. Kaiwo/AIMService groups are
    /// resolved at runtime via `wcp-dispatcher::discovery` since the
    /// installed CRD version is not assumed fixed (see SPEC_FULL §ADDED).
    pub fn is_native_kubernetes(&self) -> bool {
        !matches!(
            self,
            ComponentKind::KaiwoJob
                | ComponentKind::KaiwoService
                | ComponentKind::AimService
                | ComponentKind::ExternalSecret
        )
    }

    pub fn requires_scheduling_queue_label(&self) -> bool {
        matches!(
            self,
            ComponentKind::Pod
                | ComponentKind::Job
                | ComponentKind::Deployment
                | ComponentKind::StatefulSet
                | ComponentKind::DaemonSet
                | ComponentKind::CronJob
        )
    }

    pub fn has_pod_template(&self) -> bool {
        matches!(
            self,
            ComponentKind::Deployment | ComponentKind::Job | ComponentKind::StatefulSet
        )
    }

    pub fn is_kaiwo(&self) -> bool {
        matches!(self, ComponentKind::KaiwoJob | ComponentKind::KaiwoService)
    }
}

/// Statuses shared across every kind, overlaid on top of the kind-specific
/// native status. A component's stored status is always one of these two
/// branches — never a bare string (spec §9's reshaping requirement).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommonComponentStatus {
    Registered,
    CreateFailed,
    DeleteFailed,
    Deleted,
}

macro_rules! native_status_enum {
    ($name:ident { $($variant:ident),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $($variant),+
        }
    };
}

native_status_enum!(JobStatus { Pending, Suspended, Running, Complete, Failed });
native_status_enum!(DeploymentStatus { Pending, Running });
native_status_enum!(PodStatus { Pending, Running, Complete, Failed });
native_status_enum!(ServiceStatus { Pending, Ready, Invalid });
native_status_enum!(ConfigMapStatus { Added, Failed });
native_status_enum!(IngressStatus { Added });
native_status_enum!(HttpRouteStatus { Added });
native_status_enum!(StatefulSetStatus { Pending, Running });
native_status_enum!(DaemonSetStatus { Pending, Running });
native_status_enum!(CronJobStatus { Suspended, Running, Ready });
native_status_enum!(KaiwoJobStatus {
    Pending,
    Error,
    Starting,
    Terminating,
    Downloading,
    Running,
    Complete,
    Failed,
    Terminated,
});
native_status_enum!(KaiwoServiceStatus {
    Pending,
    Error,
    Starting,
    Terminating,
    Downloading,
    Running,
    Complete,
    Failed,
    Terminated,
});
native_status_enum!(AimServiceStatus { Pending, Starting, Degraded, Running, Failed });

/// The kind-appropriate native status, tagged by kind so the resolver
/// never has to guess which enum a bare value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "status")]
pub enum NativeStatus {
    Job(JobStatus),
    Deployment(DeploymentStatus),
    Pod(PodStatus),
    Service(ServiceStatus),
    ConfigMap(ConfigMapStatus),
    Ingress(IngressStatus),
    HttpRoute(HttpRouteStatus),
    StatefulSet(StatefulSetStatus),
    DaemonSet(DaemonSetStatus),
    CronJob(CronJobStatus),
    KaiwoJob(KaiwoJobStatus),
    KaiwoService(KaiwoServiceStatus),
    AimService(AimServiceStatus),
}

/// A component's full stored status: either one of the four statuses
/// common to every kind, or a kind-specific native status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ComponentStatus {
    Common(CommonComponentStatus),
    Native(NativeStatus),
}

impl ComponentStatus {
    pub fn is_failed_or_create_failed(&self) -> bool {
        matches!(self, ComponentStatus::Common(CommonComponentStatus::CreateFailed))
            || self.in_set(failed_set)
    }

    pub fn is_delete_failed(&self) -> bool {
        matches!(self, ComponentStatus::Common(CommonComponentStatus::DeleteFailed))
    }

    pub fn is_deleted(&self) -> bool {
        matches!(self, ComponentStatus::Common(CommonComponentStatus::Deleted))
    }

    pub fn is_registered(&self) -> bool {
        matches!(self, ComponentStatus::Common(CommonComponentStatus::Registered))
    }

    pub fn in_completed_set(&self) -> bool {
        self.in_set(completed_set)
    }

    pub fn in_running_set(&self) -> bool {
        self.in_set(running_set)
    }

    pub fn in_pending_set(&self) -> bool {
        self.in_set(pending_set)
    }

    pub fn in_downloading_set(&self) -> bool {
        self.in_set(downloading_set)
    }

    pub fn in_terminated_set(&self) -> bool {
        self.in_set(terminated_set)
    }

    fn in_set(&self, set_fn: fn(NativeStatus) -> bool) -> bool {
        match self {
            ComponentStatus::Native(n) => set_fn(*n),
            ComponentStatus::Common(_) => false,
        }
    }
}

/// `COMPONENT_SPECIFIC_COMPLETED_STATUSES`, reproduced exactly from
/// `original_source/services/airm/api/app/workloads/constants.py`.
fn completed_set(n: NativeStatus) -> bool {
    matches!(
        n,
        NativeStatus::Job(JobStatus::Complete)
            | NativeStatus::KaiwoJob(KaiwoJobStatus::Complete)
            | NativeStatus::KaiwoService(KaiwoServiceStatus::Complete)
            | NativeStatus::Service(ServiceStatus::Ready)
            | NativeStatus::ConfigMap(ConfigMapStatus::Added)
            | NativeStatus::HttpRoute(HttpRouteStatus::Added)
            | NativeStatus::Ingress(IngressStatus::Added)
            | NativeStatus::Pod(PodStatus::Complete)
    )
}

fn failed_set(n: NativeStatus) -> bool {
    matches!(
        n,
        NativeStatus::Job(JobStatus::Failed)
            | NativeStatus::Pod(PodStatus::Failed)
            | NativeStatus::Service(ServiceStatus::Invalid)
            | NativeStatus::KaiwoService(KaiwoServiceStatus::Failed)
            | NativeStatus::KaiwoJob(KaiwoJobStatus::Failed)
            | NativeStatus::AimService(AimServiceStatus::Failed)
            | NativeStatus::ConfigMap(ConfigMapStatus::Failed)
    )
}

fn pending_set(n: NativeStatus) -> bool {
    matches!(
        n,
        NativeStatus::Job(JobStatus::Suspended)
            | NativeStatus::Job(JobStatus::Pending)
            | NativeStatus::Deployment(DeploymentStatus::Pending)
            | NativeStatus::StatefulSet(StatefulSetStatus::Pending)
            | NativeStatus::Pod(PodStatus::Pending)
            | NativeStatus::DaemonSet(DaemonSetStatus::Pending)
            | NativeStatus::CronJob(CronJobStatus::Suspended)
            | NativeStatus::KaiwoService(KaiwoServiceStatus::Pending)
            | NativeStatus::KaiwoService(KaiwoServiceStatus::Error)
            | NativeStatus::KaiwoService(KaiwoServiceStatus::Starting)
            | NativeStatus::KaiwoService(KaiwoServiceStatus::Terminating)
            | NativeStatus::KaiwoJob(KaiwoJobStatus::Pending)
            | NativeStatus::KaiwoJob(KaiwoJobStatus::Error)
            | NativeStatus::KaiwoJob(KaiwoJobStatus::Starting)
            | NativeStatus::KaiwoJob(KaiwoJobStatus::Terminating)
            | NativeStatus::AimService(AimServiceStatus::Pending)
            | NativeStatus::AimService(AimServiceStatus::Starting)
            | NativeStatus::AimService(AimServiceStatus::Degraded)
            | NativeStatus::Service(ServiceStatus::Pending)
    )
}

fn running_set(n: NativeStatus) -> bool {
    matches!(
        n,
        NativeStatus::Job(JobStatus::Running)
            | NativeStatus::Deployment(DeploymentStatus::Running)
            | NativeStatus::KaiwoJob(KaiwoJobStatus::Running)
            | NativeStatus::KaiwoService(KaiwoServiceStatus::Running)
            | NativeStatus::AimService(AimServiceStatus::Running)
            | NativeStatus::DaemonSet(DaemonSetStatus::Running)
            | NativeStatus::StatefulSet(StatefulSetStatus::Running)
            | NativeStatus::CronJob(CronJobStatus::Running)
            | NativeStatus::CronJob(CronJobStatus::Ready)
            | NativeStatus::Pod(PodStatus::Running)
    )
}

fn downloading_set(n: NativeStatus) -> bool {
    matches!(
        n,
        NativeStatus::KaiwoJob(KaiwoJobStatus::Downloading) | NativeStatus::KaiwoService(KaiwoServiceStatus::Downloading)
    )
}

fn terminated_set(n: NativeStatus) -> bool {
    matches!(
        n,
        NativeStatus::KaiwoJob(KaiwoJobStatus::Terminated) | NativeStatus::KaiwoService(KaiwoServiceStatus::Terminated)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn job_complete_is_in_completed_set_only() {
        let s = ComponentStatus::Native(NativeStatus::Job(JobStatus::Complete));
        assert!(s.in_completed_set());
        assert!(!s.in_running_set());
        assert!(!s.in_pending_set());
    }

    #[test]
    fn kaiwo_job_downloading_is_isolated() {
        let s = ComponentStatus::Native(NativeStatus::KaiwoJob(KaiwoJobStatus::Downloading));
        assert!(s.in_downloading_set());
        assert!(!s.in_pending_set());
        assert!(!s.in_running_set());
    }

    #[test]
    fn create_failed_counts_as_failed() {
        let s = ComponentStatus::Common(CommonComponentStatus::CreateFailed);
        assert_eq!(s.is_failed_or_create_failed(), true);
    }
}
