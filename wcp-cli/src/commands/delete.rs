use log::error;
use uuid::Uuid;

use crate::client::Client;

pub async fn handle_delete(client: &Client, workload_id: Uuid) {
    match client.delete(workload_id).await {
        Ok(()) => println!("Deletion requested for workload {workload_id}"),
        Err(e) => {
            error!("failed to delete workload {workload_id}: {e}");
            std::process::exit(1);
        }
    }
}
