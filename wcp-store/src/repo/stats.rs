use async_trait::async_trait;
use uuid::Uuid;
use wcp_defs::model::WorkloadStatus;

use crate::records::workload_status_from_str;

/// Running/pending counts by cluster/project (spec §6's "Stats" HTTP
/// surface). Organization-level rollup is omitted: there is no
/// `organizations` table in this schema — project/cluster is as far as
/// the data model goes.
#[derive(Debug, Clone)]
pub struct StatusCount {
    pub cluster_id: Uuid,
    pub project_id: Uuid,
    pub status: WorkloadStatus,
    pub count: i64,
}

#[async_trait]
pub trait StatsRepo: Send + Sync {
    async fn status_counts(&self, pool: &sqlx::PgPool) -> anyhow::Result<Vec<StatusCount>>;
}

pub struct DbStatsRepo;

#[async_trait]
impl StatsRepo for DbStatsRepo {
    async fn status_counts(&self, pool: &sqlx::PgPool) -> anyhow::Result<Vec<StatusCount>> {
        let rows: Vec<(Uuid, Uuid, String, i64)> = sqlx::query_as(
            "SELECT cluster_id, project_id, status, COUNT(*)
               FROM workloads
              GROUP BY cluster_id, project_id, status",
        )
        .fetch_all(pool)
        .await?;

        rows.into_iter()
            .map(|(cluster_id, project_id, status, count)| {
                Ok(StatusCount { cluster_id, project_id, status: workload_status_from_str(&status)?, count })
            })
            .collect::<Result<Vec<_>, wcp_defs::WcpError>>()
            .map_err(Into::into)
    }
}
