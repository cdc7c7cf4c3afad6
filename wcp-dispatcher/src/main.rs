use std::sync::Arc;

use kube::Client as KubeClient;
use wcp_dispatcher::config::Config;
use wcp_dispatcher::dispatcher;
use wcp_queue::{cluster_queue_name, Bus, FEEDBACK_QUEUE};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    wcp_utils::logging::setup_logging()?;
    let config = Config::from_env()?;

    let client = KubeClient::try_default().await?;
    let bus = Arc::new(Bus::connect(&config.rabbitmq_url).await?);
    let work_queue = cluster_queue_name(config.cluster_id);
    bus.declare_queue(&work_queue).await?;
    bus.declare_queue(FEEDBACK_QUEUE).await?;

    log::info!("wcp-dispatcher starting for cluster {}", config.cluster_id);
    dispatcher::run(client, bus, work_queue, config.cluster_id).await
}
