//! Aggregate status resolver (spec §4.4) — a pure function over the
//! workload's current status and its components' statuses. No I/O, no
//! side effects; this is the function spec §8 calls out as needing to
//! be a pure function of `(status, multiset of component statuses)`.

use wcp_defs::model::{ComponentView, WorkloadStatus};

pub fn resolve(current: WorkloadStatus, components: &[ComponentView]) -> WorkloadStatus {
    // Rule 1
    if components.iter().all(|c| c.status.is_deleted()) {
        return WorkloadStatus::Deleted;
    }

    // Rule 2
    if components.iter().any(|c| c.status.is_delete_failed()) {
        return WorkloadStatus::DeleteFailed;
    }

    // Rule 3
    if current == WorkloadStatus::Deleting {
        return WorkloadStatus::Deleting;
    }

    // Rule 4
    if components.iter().all(|c| c.status.in_completed_set()) {
        return WorkloadStatus::Complete;
    }

    // Rule 5
    if components.iter().any(|c| c.status.in_downloading_set()) {
        return WorkloadStatus::Downloading;
    }

    // Rule 6
    if components
        .iter()
        .all(|c| c.status.is_deleted() || c.status.in_completed_set() || c.status.in_terminated_set())
    {
        return WorkloadStatus::Terminated;
    }

    // Rule 7
    if components.iter().any(|c| c.status.is_failed_or_create_failed()) {
        return WorkloadStatus::Failed;
    }

    // Rule 8
    if components.iter().any(|c| c.status.in_pending_set() || c.status.is_registered()) {
        return WorkloadStatus::Pending;
    }

    // Rule 9
    if components.iter().any(|c| c.status.in_running_set()) {
        return WorkloadStatus::Running;
    }

    // Rule 10
    WorkloadStatus::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wcp_defs::kinds::{
        CommonComponentStatus, ComponentKind, ComponentStatus, DeploymentStatus, JobStatus, NativeStatus, PodStatus,
        ServiceStatus,
    };

    // `kind` is irrelevant to the resolver; a fixed placeholder keeps the
    // test helpers focused on the status being exercised.
    fn native(n: NativeStatus) -> ComponentView {
        ComponentView { kind: ComponentKind::Pod, status: ComponentStatus::Native(n) }
    }

    fn common(c: CommonComponentStatus) -> ComponentView {
        ComponentView { kind: ComponentKind::Pod, status: ComponentStatus::Common(c) }
    }

    /// Seed scenario 1: Deployment + Service, happy path.
    #[test]
    fn happy_path_inference_sequence() {
        let registered = vec![common(CommonComponentStatus::Registered), common(CommonComponentStatus::Registered)];
        assert_eq!(resolve(WorkloadStatus::Pending, &registered), WorkloadStatus::Pending);

        // Deployment RUNNING, Service still PENDING: rule 8 (pending) wins over rule 9.
        let mid = vec![
            native(NativeStatus::Deployment(DeploymentStatus::Running)),
            native(NativeStatus::Service(ServiceStatus::Pending)),
        ];
        assert_eq!(resolve(WorkloadStatus::Pending, &mid), WorkloadStatus::Pending);

        // Service READY too: neither pending nor completed-for-all (Deployment has no
        // completed set), so rule 9 (running) fires.
        let done = vec![
            native(NativeStatus::Deployment(DeploymentStatus::Running)),
            native(NativeStatus::Service(ServiceStatus::Ready)),
        ];
        assert_eq!(resolve(WorkloadStatus::Pending, &done), WorkloadStatus::Running);
    }

    /// Seed scenario 2: mixed terminal — Job COMPLETE, Pod FAILED -> FAILED.
    #[test]
    fn mixed_terminal_is_failed() {
        let components = vec![
            native(NativeStatus::Job(JobStatus::Complete)),
            native(NativeStatus::Pod(PodStatus::Failed)),
        ];
        assert_eq!(resolve(WorkloadStatus::Running, &components), WorkloadStatus::Failed);
    }

    /// Seed scenario 3: delete race — all DELETED -> DELETED regardless of prior status.
    #[test]
    fn all_deleted_wins_over_deleting() {
        let components = vec![
            common(CommonComponentStatus::Deleted),
            common(CommonComponentStatus::Deleted),
            common(CommonComponentStatus::Deleted),
        ];
        assert_eq!(resolve(WorkloadStatus::Deleting, &components), WorkloadStatus::Deleted);
    }

    #[test]
    fn deleting_is_sticky_until_all_deleted() {
        let components = vec![
            common(CommonComponentStatus::Deleted),
            native(NativeStatus::Pod(PodStatus::Running)),
        ];
        assert_eq!(resolve(WorkloadStatus::Deleting, &components), WorkloadStatus::Deleting);
    }

    #[test]
    fn any_delete_failed_wins_even_over_deleting() {
        let components = vec![
            common(CommonComponentStatus::Deleted),
            common(CommonComponentStatus::DeleteFailed),
        ];
        assert_eq!(resolve(WorkloadStatus::Deleting, &components), WorkloadStatus::DeleteFailed);
    }

    #[test]
    fn downloading_beats_terminated_and_failed_rules() {
        let components = vec![native(NativeStatus::KaiwoJob(wcp_defs::kinds::KaiwoJobStatus::Downloading))];
        assert_eq!(resolve(WorkloadStatus::Pending, &components), WorkloadStatus::Downloading);
    }

    #[test]
    fn no_components_is_vacuously_deleted() {
        assert_eq!(resolve(WorkloadStatus::Pending, &[]), WorkloadStatus::Deleted);
    }

}
