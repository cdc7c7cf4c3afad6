use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[async_trait]
pub trait ClusterRepo: Send + Sync {
    async fn last_heartbeat_at(&self, pool: &sqlx::PgPool, cluster_id: Uuid) -> anyhow::Result<Option<DateTime<Utc>>>;
}

pub struct DbClusterRepo;

#[async_trait]
impl ClusterRepo for DbClusterRepo {
    async fn last_heartbeat_at(&self, pool: &sqlx::PgPool, cluster_id: Uuid) -> anyhow::Result<Option<DateTime<Utc>>> {
        let row: Option<(Option<DateTime<Utc>>,)> =
            sqlx::query_as("SELECT last_heartbeat_at FROM clusters WHERE id = $1")
                .bind(cluster_id)
                .fetch_optional(pool)
                .await?;

        Ok(row.and_then(|(hb,)| hb))
    }
}
