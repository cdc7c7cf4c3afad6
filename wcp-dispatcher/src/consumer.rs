//! Cluster work-queue consumer. Mirrors `wcp_common::logic::feedback::run`'s
//! consume-decode-dispatch-ack shape (itself grounded in the teacher's
//! watcher task loop), but reads `cluster.<id>.workloads` instead of
//! `feedback.common` and dispatches to the applier instead of the status
//! resolver.

use futures::StreamExt;
use kube::Client;
use wcp_defs::BusMessage;
use wcp_queue::{Bus, Delivery, FEEDBACK_QUEUE};

use crate::applier;

pub async fn run(client: &Client, bus: &Bus, work_queue: &str) -> anyhow::Result<()> {
    let mut consumer = bus.consume(work_queue, "wcp-dispatcher").await?;

    while let Some(delivery) = consumer.next().await {
        let delivery = match delivery {
            Ok(d) => d,
            Err(e) => {
                log::error!("error receiving delivery from {work_queue}: {e}");
                continue;
            }
        };

        let decoded = match Delivery::from_raw(delivery) {
            Ok(d) => d,
            Err(e) => {
                log::error!("dropping undecodable message on {work_queue}: {e}");
                continue;
            }
        };

        if let Err(e) = dispatch(client, bus, &decoded.message).await {
            log::error!("error processing message from {work_queue}: {e}");
        }
        decoded.ack().await?;
    }

    Ok(())
}

async fn dispatch(client: &Client, bus: &Bus, message: &BusMessage) -> anyhow::Result<()> {
    match message {
        BusMessage::Workload(msg) => applier::apply_workload(client, bus, FEEDBACK_QUEUE, msg).await,
        BusMessage::DeleteWorkload(msg) => applier::delete_workload(client, bus, FEEDBACK_QUEUE, msg).await,
        other => {
            log::warn!("dropping message not valid on a cluster work queue: {other:?}");
            Ok(())
        }
    }
}
