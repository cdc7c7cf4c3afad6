mod client;
mod commands;
mod config;

use clap::{Parser, Subcommand};
use uuid::Uuid;

use crate::client::Client;
use crate::config::Config;

/// Thin operator CLI for the workload control plane. Trimmed from the
/// teacher's TUI and Terraform-module-registry subcommands, which have
/// no counterpart here — this talks to `wcp-api` and nothing else.
#[derive(Parser)]
#[command(name = "wcp", version, about = "Workload control plane CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Submit a manifest as a new workload
    Submit {
        /// Project the workload belongs to
        #[arg(long)]
        project_id: Uuid,
        /// One of MODEL_DOWNLOAD, INFERENCE, FINE_TUNING, WORKSPACE, CUSTOM
        #[arg(long)]
        workload_type: String,
        #[arg(long)]
        display_name: String,
        #[arg(long)]
        submitter: Option<String>,
        #[arg(long)]
        user_token: Option<String>,
        /// Path to the manifest file, e.g. workload.yaml
        manifest: String,
    },
    /// Look up a workload and its components
    Get { workload_id: Uuid },
    /// Request deletion of a workload
    Delete { workload_id: Uuid },
    /// List workloads for a project
    List { project_id: Uuid },
    /// Workload status counts, grouped by cluster and project
    Stats,
}

#[tokio::main]
async fn main() {
    if let Err(e) = wcp_utils::logging::setup_logging() {
        eprintln!("failed to initialize logging: {e}");
        std::process::exit(1);
    }

    let cli = Cli::parse();
    let config = Config::from_env();
    let client = Client::new(config.api_url);

    match cli.command {
        Command::Submit { project_id, workload_type, display_name, submitter, user_token, manifest } => {
            commands::submit::handle_submit(
                &client,
                project_id,
                &workload_type,
                &display_name,
                submitter.as_deref(),
                user_token.as_deref(),
                &manifest,
            )
            .await;
        }
        Command::Get { workload_id } => commands::get::handle_get(&client, workload_id).await,
        Command::Delete { workload_id } => commands::delete::handle_delete(&client, workload_id).await,
        Command::List { project_id } => commands::list::handle_list(&client, project_id).await,
        Command::Stats => commands::stats::handle_stats(&client).await,
    }
}
