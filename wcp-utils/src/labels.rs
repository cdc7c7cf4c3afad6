//! Label/annotation contract attached to every Kubernetes resource
//! belonging to a workload (spec §6).

pub const WORKLOAD_ID_LABEL: &str = "airm.silogen.ai/workload-id";
pub const COMPONENT_ID_LABEL: &str = "airm.silogen.ai/component-id";
pub const PROJECT_ID_LABEL: &str = "airm.silogen.ai/project-id";
pub const SCHEDULING_QUEUE_LABEL: &str = "kueue.x-k8s.io/queue-name";

/// Recorded by the dispatcher on resources it submits, read back on
/// auto-discovery so `submitter` can be populated on
/// `AutoDiscoveredWorkloadComponentMessage`.
pub const WORKLOAD_SUBMITTER_ANNOTATION: &str = "airm.silogen.ai/submitted-by";

/// Set by a controller (e.g. Kaiwo) on children it spawns that were never
/// part of the original manifest. The dispatcher's watcher publishes
/// `AutoDiscoveredWorkloadComponentMessage` whenever it sees this
/// annotation, unconditionally — it has no DB to check against. The
/// API-side feedback consumer is what makes this idempotent, by only
/// inserting a component row if one doesn't already exist for the id.
pub const AUTO_DISCOVERED_WORKLOAD_ANNOTATION: &str = "airm.silogen.ai/auto-discovered";
