//! Seed scenario 5 (auto-discovery): a controller-spawned Job, labelled
//! with an existing workload-id but a component-id the dispatcher has
//! never seen, carries the auto-discovered annotation. The dispatcher's
//! watcher must publish `AutoDiscoveredWorkloadComponent` followed by a
//! native status update, unconditionally on the annotation (see
//! `wcp-utils/src/labels.rs`'s `AUTO_DISCOVERED_WORKLOAD_ANNOTATION` doc
//! comment).

mod support;

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use kube::api::{Api, PostParams};
use uuid::Uuid;
use wcp_defs::messages::BusMessage;
use wcp_queue::{Delivery, FEEDBACK_QUEUE};
use wcp_utils::labels::{AUTO_DISCOVERED_WORKLOAD_ANNOTATION, COMPONENT_ID_LABEL, PROJECT_ID_LABEL, WORKLOAD_ID_LABEL};

#[tokio::test]
async fn auto_discovered_job_publishes_discovery_then_status() {
    let k3s = support::start_k3s().await;
    let client = support::get_kube_client(&k3s).await;
    let (_rabbit, bus) = support::start_rabbitmq().await;
    let bus = Arc::new(bus);

    wcp_dispatcher::watcher::start_all(client.clone(), bus.clone()).await;

    let workload_id = Uuid::new_v4();
    let component_id = Uuid::new_v4();
    let project_id = Uuid::new_v4();

    let job_yaml = format!(
        r#"
apiVersion: batch/v1
kind: Job
metadata:
  name: auto-discovered-child
  namespace: default
  labels:
    {WORKLOAD_ID_LABEL}: "{workload_id}"
    {COMPONENT_ID_LABEL}: "{component_id}"
    {PROJECT_ID_LABEL}: "{project_id}"
  annotations:
    {AUTO_DISCOVERED_WORKLOAD_ANNOTATION}: "true"
spec:
  template:
    spec:
      containers:
        - name: worker
          image: busybox
          command: ["sh", "-c", "sleep 3600"]
      restartPolicy: Never
"#
    );
    let job: kube::api::DynamicObject = serde_yaml::from_str(&job_yaml).unwrap();
    let ar = kube::api::ApiResource::from_gvk(&kube::api::GroupVersionKind {
        group: "batch".into(),
        version: "v1".into(),
        kind: "Job".into(),
    });
    let jobs: Api<kube::api::DynamicObject> = Api::namespaced_with(client.clone(), "default", &ar);
    jobs.create(&PostParams::default(), &job).await.unwrap();

    bus.declare_queue(FEEDBACK_QUEUE).await.unwrap();
    let mut consumer = bus.consume(FEEDBACK_QUEUE, "test-feedback-consumer").await.unwrap();

    let mut saw_auto_discovered = false;
    let mut saw_status_update = false;
    let deadline = tokio::time::Instant::now() + Duration::from_secs(30);
    while tokio::time::Instant::now() < deadline && !(saw_auto_discovered && saw_status_update) {
        let Ok(Some(Ok(raw))) = tokio::time::timeout(Duration::from_secs(5), consumer.next()).await else {
            continue;
        };
        let decoded = Delivery::from_raw(raw).unwrap();
        match &decoded.message {
            BusMessage::AutoDiscoveredWorkloadComponent(m) if m.component_id == component_id => {
                assert_eq!(m.workload_id, workload_id);
                assert_eq!(m.project_id, project_id);
                saw_auto_discovered = true;
            }
            BusMessage::WorkloadComponentStatusUpdate(m) if m.component_id == component_id => {
                saw_status_update = true;
            }
            _ => {}
        }
        decoded.ack().await.unwrap();
    }

    assert!(saw_auto_discovered, "expected an AutoDiscoveredWorkloadComponent message for the child Job");
    assert!(saw_status_update, "expected a native status update for the child Job");
}
