use log::error;
use uuid::Uuid;

use crate::client::Client;

pub async fn handle_list(client: &Client, project_id: Uuid) {
    match client.list(project_id).await {
        Ok(workloads) => {
            println!("{:<38} {:<15} {:<20} {:<25}", "Workload ID", "Status", "Type", "Display Name");
            for w in &workloads {
                println!("{:<38} {:<15} {:<20} {:<25}", w.id, format!("{:?}", w.status), format!("{:?}", w.workload_type), w.display_name);
            }
        }
        Err(e) => {
            error!("failed to list workloads for project {project_id}: {e}");
            std::process::exit(1);
        }
    }
}
