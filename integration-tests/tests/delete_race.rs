//! Seed scenario 3 (delete race) and the "delete twice" boundary
//! behavior: apply a workload's manifest to a real cluster, delete it,
//! then delete it again. The first delete must actually remove the
//! labelled resources and report no failures; the second delete finds
//! nothing and falls back to a direct `WorkloadStatusMessage{Deleted}`
//! (see `wcp-dispatcher/src/applier.rs::delete_workload`).

mod support;

use std::time::Duration;

use futures::StreamExt;
use kube::api::{Api, ListParams};
use uuid::Uuid;
use wcp_defs::messages::{DeleteWorkloadMessage, WorkloadMessage};
use wcp_defs::model::WorkloadStatus;
use wcp_defs::BusMessage;
use wcp_queue::{Delivery, FEEDBACK_QUEUE};
use wcp_utils::labels::{COMPONENT_ID_LABEL, WORKLOAD_ID_LABEL};

#[tokio::test]
async fn deleting_twice_only_reports_deleted_on_the_second_call_when_nothing_is_left() {
    let k3s = support::start_k3s().await;
    let client = support::get_kube_client(&k3s).await;
    let (_rabbit, bus) = support::start_rabbitmq().await;
    bus.declare_queue(FEEDBACK_QUEUE).await.unwrap();

    let workload_id = Uuid::new_v4();
    let component_id = Uuid::new_v4();
    let manifest = format!(
        r#"
apiVersion: v1
kind: ConfigMap
metadata:
  name: delete-race-cm
  namespace: default
  labels:
    {WORKLOAD_ID_LABEL}: "{workload_id}"
    {COMPONENT_ID_LABEL}: "{component_id}"
data:
  key: value
"#
    );

    wcp_dispatcher::applier::apply_workload(
        &client,
        &bus,
        FEEDBACK_QUEUE,
        &WorkloadMessage { workload_id, manifest, user_token: "tok".into() },
    )
    .await
    .unwrap();

    let cms: Api<kube::api::ConfigMap> = Api::namespaced(client.clone(), "default");
    let label_selector = format!("{WORKLOAD_ID_LABEL}={workload_id}");
    let found = cms.list(&ListParams::default().labels(&label_selector)).await.unwrap();
    assert_eq!(found.items.len(), 1, "expected the ConfigMap to have actually been applied");

    let mut consumer = bus.consume(FEEDBACK_QUEUE, "test-feedback-consumer").await.unwrap();

    wcp_dispatcher::applier::delete_workload(&client, &bus, FEEDBACK_QUEUE, &DeleteWorkloadMessage { workload_id })
        .await
        .unwrap();

    let remaining = cms.list(&ListParams::default().labels(&label_selector)).await.unwrap();
    assert!(remaining.items.is_empty(), "expected the first delete to remove the ConfigMap");

    wcp_dispatcher::applier::delete_workload(&client, &bus, FEEDBACK_QUEUE, &DeleteWorkloadMessage { workload_id })
        .await
        .unwrap();

    let mut saw_direct_deleted_status = false;
    let deadline = tokio::time::Instant::now() + Duration::from_secs(15);
    while tokio::time::Instant::now() < deadline {
        let Ok(Some(Ok(raw))) = tokio::time::timeout(Duration::from_secs(5), consumer.next()).await else {
            continue;
        };
        let decoded = Delivery::from_raw(raw).unwrap();
        if let BusMessage::WorkloadStatus(m) = &decoded.message {
            if m.workload_id == workload_id {
                assert_eq!(m.status, WorkloadStatus::Deleted);
                saw_direct_deleted_status = true;
                decoded.ack().await.unwrap();
                break;
            }
        }
        decoded.ack().await.unwrap();
    }

    assert!(saw_direct_deleted_status, "expected the second delete to publish a direct WorkloadStatusMessage{{Deleted}}");
}
