use log::error;
use uuid::Uuid;

use crate::client::Client;

#[allow(clippy::too_many_arguments)]
pub async fn handle_submit(
    client: &Client,
    project_id: Uuid,
    workload_type: &str,
    display_name: &str,
    submitter: Option<&str>,
    user_token: Option<&str>,
    manifest_path: &str,
) {
    let manifest_bytes = match std::fs::read(manifest_path) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("failed to read manifest file {manifest_path}: {e}");
            std::process::exit(1);
        }
    };

    match client.submit(project_id, workload_type, display_name, submitter, user_token, manifest_bytes).await {
        Ok(resp) => {
            println!("Workload submitted: {}", resp.workload_id);
            println!("  type:   {:?}", resp.workload_type);
            println!("  name:   {}", resp.display_name);
            println!("  status: {:?}", resp.status);
        }
        Err(e) => {
            error!("failed to submit workload: {e}");
            std::process::exit(1);
        }
    }
}
