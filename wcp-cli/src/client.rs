//! Thin `reqwest` wrapper over `wcp-api`'s HTTP surface. Response shapes
//! are declared locally rather than imported from `wcp-api` (a bin-only
//! crate with no lib target) — the CLI treats the API the same way any
//! external client would, deserializing only the wire contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wcp_defs::model::{WorkloadStatus, WorkloadType};

#[derive(Debug, Serialize, Deserialize)]
pub struct ComponentV1 {
    pub id: Uuid,
    pub name: String,
    pub kind: String,
    pub status: serde_json::Value,
    pub status_reason: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WorkloadV1 {
    pub id: Uuid,
    pub project_id: Uuid,
    pub cluster_id: Uuid,
    pub workload_type: WorkloadType,
    pub display_name: String,
    pub status: WorkloadStatus,
    pub last_status_transition_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub components: Vec<ComponentV1>,
}

#[derive(Debug, Deserialize)]
pub struct WorkloadSummaryV1 {
    pub id: Uuid,
    pub project_id: Uuid,
    pub workload_type: WorkloadType,
    pub display_name: String,
    pub status: WorkloadStatus,
    pub last_status_transition_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitResponseV1 {
    pub workload_id: Uuid,
    pub status: WorkloadStatus,
    pub workload_type: WorkloadType,
    pub display_name: String,
}

#[derive(Debug, Deserialize)]
pub struct StatCountV1 {
    pub cluster_id: Uuid,
    pub project_id: Uuid,
    pub status: WorkloadStatus,
    pub count: i64,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl Client {
    pub fn new(base_url: String) -> Self {
        Client { http: reqwest::Client::new(), base_url }
    }

    async fn error_for_status(response: reqwest::Response) -> anyhow::Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body: ErrorBody = response
            .json()
            .await
            .unwrap_or_else(|_| ErrorBody { error: format!("request failed with status {status}") });
        anyhow::bail!("{status}: {}", body.error)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn submit(
        &self,
        project_id: Uuid,
        workload_type: &str,
        display_name: &str,
        submitter: Option<&str>,
        user_token: Option<&str>,
        manifest_bytes: Vec<u8>,
    ) -> anyhow::Result<SubmitResponseV1> {
        let mut form = reqwest::multipart::Form::new()
            .text("project_id", project_id.to_string())
            .text("workload_type", workload_type.to_string())
            .text("display_name", display_name.to_string())
            .part("manifest", reqwest::multipart::Part::bytes(manifest_bytes).file_name("manifest.yaml"));
        if let Some(submitter) = submitter {
            form = form.text("submitter", submitter.to_string());
        }
        if let Some(user_token) = user_token {
            form = form.text("user_token", user_token.to_string());
        }

        let response = self.http.post(format!("{}/api/v1/workloads", self.base_url)).multipart(form).send().await?;
        let response = Self::error_for_status(response).await?;
        Ok(response.json().await?)
    }

    pub async fn get(&self, workload_id: Uuid) -> anyhow::Result<WorkloadV1> {
        let response = self.http.get(format!("{}/api/v1/workloads/{workload_id}", self.base_url)).send().await?;
        let response = Self::error_for_status(response).await?;
        Ok(response.json().await?)
    }

    pub async fn delete(&self, workload_id: Uuid) -> anyhow::Result<()> {
        let response = self.http.delete(format!("{}/api/v1/workloads/{workload_id}", self.base_url)).send().await?;
        Self::error_for_status(response).await?;
        Ok(())
    }

    pub async fn list(&self, project_id: Uuid) -> anyhow::Result<Vec<WorkloadSummaryV1>> {
        let response =
            self.http.get(format!("{}/api/v1/projects/{project_id}/workloads", self.base_url)).send().await?;
        let response = Self::error_for_status(response).await?;
        Ok(response.json().await?)
    }

    pub async fn stats(&self) -> anyhow::Result<Vec<StatCountV1>> {
        let response = self.http.get(format!("{}/api/v1/stats", self.base_url)).send().await?;
        let response = Self::error_for_status(response).await?;
        Ok(response.json().await?)
    }
}
