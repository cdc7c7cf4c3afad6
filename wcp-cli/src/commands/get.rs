use log::error;
use uuid::Uuid;

use crate::client::Client;

pub async fn handle_get(client: &Client, workload_id: Uuid) {
    match client.get(workload_id).await {
        Ok(workload) => println!("{}", serde_json::to_string_pretty(&workload).unwrap()),
        Err(e) => {
            error!("failed to get workload {workload_id}: {e}");
            std::process::exit(1);
        }
    }
}
