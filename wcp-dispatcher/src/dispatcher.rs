//! Top-level leader-election loop. Grounded directly in
//! `operator/src/operator.rs`'s `start_operator`/`create_lease_lock`/
//! `acquire_leadership_and_run_once`/`renew_leadership`: one
//! `kube_leader_election::LeaseLock` per dispatcher process, the consumer
//! and watchers started exactly once per process on first acquiring
//! leadership, renewed on a fixed interval until renewal fails.

use std::sync::Arc;
use std::time::Duration;

use kube::Client;
use kube_leader_election::{LeaseLock, LeaseLockParams};
use tokio::time;
use uuid::Uuid;
use wcp_queue::Bus;

use crate::{consumer, watcher};

const NAMESPACE: &str = "default";
const DISPATCHER_NAME: &str = "wcp-dispatcher";

pub async fn run(client: Client, bus: Arc<Bus>, work_queue: String, cluster_id: Uuid) -> anyhow::Result<()> {
    let leadership = create_lease_lock(client.clone(), cluster_id);
    let mut started = false;

    loop {
        if acquire_leadership_and_run_once(&client, &bus, &work_queue, &leadership, &mut started).await {
            renew_leadership(&leadership).await;
        } else {
            log::info!("another dispatcher already holds leadership for cluster {cluster_id}, waiting");
            time::sleep(Duration::from_secs(15)).await;
        }
    }
}

fn create_lease_lock(client: Client, cluster_id: Uuid) -> LeaseLock {
    LeaseLock::new(
        client,
        NAMESPACE,
        LeaseLockParams {
            holder_id: get_holder_id(),
            lease_name: format!("{DISPATCHER_NAME}-{cluster_id}-lock"),
            lease_ttl: Duration::from_secs(25),
        },
    )
}

fn get_holder_id() -> String {
    let pod_name = std::env::var("POD_NAME").unwrap_or_else(|_| "unknown-pod".to_string());
    format!("{DISPATCHER_NAME}-{pod_name}")
}

async fn acquire_leadership_and_run_once(
    client: &Client,
    bus: &Arc<Bus>,
    work_queue: &str,
    leadership: &LeaseLock,
    started: &mut bool,
) -> bool {
    let lease = match leadership.try_acquire_or_renew().await {
        Ok(lease) => lease,
        Err(e) => {
            log::error!("lease acquisition error: {e:?}");
            return false;
        }
    };

    if !lease.acquired_lease {
        return false;
    }

    log::info!("leadership acquired for {work_queue}");

    if !*started {
        let consumer_client = client.clone();
        let consumer_bus = bus.clone();
        let consumer_queue = work_queue.to_string();
        tokio::spawn(async move {
            if let Err(e) = consumer::run(&consumer_client, &consumer_bus, &consumer_queue).await {
                log::error!("cluster work-queue consumer exited: {e}");
            }
        });

        watcher::start_all(client.clone(), bus.clone()).await;
        *started = true;
    }

    true
}

async fn renew_leadership(leadership: &LeaseLock) {
    let mut renew_interval = time::interval(Duration::from_secs(10));
    loop {
        renew_interval.tick().await;
        match leadership.try_acquire_or_renew().await {
            Ok(lease) if lease.acquired_lease => log::debug!("leadership renewed for {DISPATCHER_NAME}"),
            Ok(_) => {
                log::warn!("lost leadership for {DISPATCHER_NAME}");
                break;
            }
            Err(e) => {
                log::error!("lost leadership due to renewal error: {e:?}");
                break;
            }
        }
    }
}
