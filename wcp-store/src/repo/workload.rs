use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Postgres, Transaction};
use uuid::Uuid;
use wcp_defs::model::{Workload, WorkloadStatus};

use crate::records::{workload_status_to_str, workload_type_to_str, WorkloadRecord};

/// Repository trait for `Workload`, grounded on
/// `golemcloud-golem`'s `ComponentRepo` trait shape (one trait, one
/// `DbXxxRepo<DB: Database>` implementer). All mutating methods take the
/// caller's transaction rather than opening their own, since submission
/// and deletion each need several repo calls to commit atomically
/// (spec §4.2/§4.3).
#[async_trait]
pub trait WorkloadRepo: Send + Sync {
    async fn insert(&self, tx: &mut Transaction<'_, Postgres>, workload: &Workload) -> anyhow::Result<()>;

    async fn get(&self, pool: &sqlx::PgPool, id: Uuid) -> anyhow::Result<Option<Workload>>;

    async fn list_for_project(&self, pool: &sqlx::PgPool, project_id: Uuid) -> anyhow::Result<Vec<Workload>>;

    async fn set_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        status: WorkloadStatus,
        transitioned_at: DateTime<Utc>,
    ) -> anyhow::Result<()>;
}

pub struct DbWorkloadRepo;

#[async_trait]
impl WorkloadRepo for DbWorkloadRepo {
    async fn insert(&self, tx: &mut Transaction<'_, Postgres>, workload: &Workload) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO workloads
                (id, project_id, cluster_id, details, workload_type, display_name, status,
                 last_status_transition_at, created_at, updated_at, created_by, updated_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(workload.id)
        .bind(workload.project_id)
        .bind(workload.cluster_id)
        .bind(serde_json::to_value(&workload.details)?)
        .bind(workload_type_to_str(workload.workload_type))
        .bind(&workload.display_name)
        .bind(workload_status_to_str(workload.status))
        .bind(workload.last_status_transition_at)
        .bind(workload.created_at)
        .bind(workload.updated_at)
        .bind(&workload.created_by)
        .bind(&workload.updated_by)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    async fn get(&self, pool: &sqlx::PgPool, id: Uuid) -> anyhow::Result<Option<Workload>> {
        let record = sqlx::query_as::<_, WorkloadRecord>("SELECT * FROM workloads WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        record.map(Workload::try_from).transpose().map_err(Into::into)
    }

    async fn list_for_project(&self, pool: &sqlx::PgPool, project_id: Uuid) -> anyhow::Result<Vec<Workload>> {
        let records = sqlx::query_as::<_, WorkloadRecord>(
            "SELECT * FROM workloads WHERE project_id = $1 ORDER BY created_at DESC",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        records.into_iter().map(Workload::try_from).collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    async fn set_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        status: WorkloadStatus,
        transitioned_at: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        sqlx::query(
            "UPDATE workloads SET status = $1, last_status_transition_at = $2, updated_at = now() WHERE id = $3",
        )
        .bind(workload_status_to_str(status))
        .bind(transitioned_at)
        .bind(id)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}
