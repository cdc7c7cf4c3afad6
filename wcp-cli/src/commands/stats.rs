use log::error;

use crate::client::Client;

pub async fn handle_stats(client: &Client) {
    match client.stats().await {
        Ok(counts) => {
            println!("{:<38} {:<38} {:<15} {:<10}", "Cluster ID", "Project ID", "Status", "Count");
            for c in &counts {
                println!("{:<38} {:<38} {:<15} {:<10}", c.cluster_id, c.project_id, format!("{:?}", c.status), c.count);
            }
        }
        Err(e) => {
            error!("failed to fetch stats: {e}");
            std::process::exit(1);
        }
    }
}
