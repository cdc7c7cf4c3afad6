use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Postgres, Transaction};
use uuid::Uuid;
use wcp_defs::kinds::ComponentStatus;
use wcp_defs::model::WorkloadComponent;

use crate::records::{component_kind_to_str, ComponentRecord};

#[async_trait]
pub trait ComponentRepo: Send + Sync {
    async fn insert(&self, tx: &mut Transaction<'_, Postgres>, component: &WorkloadComponent) -> anyhow::Result<()>;

    async fn list_for_workload(&self, pool: &sqlx::PgPool, workload_id: Uuid) -> anyhow::Result<Vec<WorkloadComponent>>;

    async fn get_by_id_kind_version(
        &self,
        pool: &sqlx::PgPool,
        id: Uuid,
        kind: &str,
        api_version: &str,
    ) -> anyhow::Result<Option<WorkloadComponent>>;

    /// Applies a status update, but only if `event_updated_at` strictly
    /// exceeds the stored `updated_at` (spec §3 invariant). Returns
    /// whether the row was actually updated, so the caller (feedback
    /// consumer) knows whether to re-run the resolver.
    async fn apply_status_if_newer(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        status: ComponentStatus,
        status_reason: Option<&str>,
        event_updated_at: DateTime<Utc>,
    ) -> anyhow::Result<bool>;
}

pub struct DbComponentRepo;

#[async_trait]
impl ComponentRepo for DbComponentRepo {
    async fn insert(&self, tx: &mut Transaction<'_, Postgres>, component: &WorkloadComponent) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO workload_components
                (id, workload_id, name, kind, api_version, status, status_reason, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(component.id)
        .bind(component.workload_id)
        .bind(&component.name)
        .bind(component_kind_to_str(component.kind))
        .bind(&component.api_version)
        .bind(serde_json::to_value(component.status)?)
        .bind(&component.status_reason)
        .bind(component.created_at)
        .bind(component.updated_at)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    async fn list_for_workload(&self, pool: &sqlx::PgPool, workload_id: Uuid) -> anyhow::Result<Vec<WorkloadComponent>> {
        let records = sqlx::query_as::<_, ComponentRecord>("SELECT * FROM workload_components WHERE workload_id = $1")
            .bind(workload_id)
            .fetch_all(pool)
            .await?;

        records
            .into_iter()
            .map(WorkloadComponent::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    async fn get_by_id_kind_version(
        &self,
        pool: &sqlx::PgPool,
        id: Uuid,
        kind: &str,
        api_version: &str,
    ) -> anyhow::Result<Option<WorkloadComponent>> {
        let record = sqlx::query_as::<_, ComponentRecord>(
            "SELECT * FROM workload_components WHERE id = $1 AND kind = $2 AND api_version = $3",
        )
        .bind(id)
        .bind(kind)
        .bind(api_version)
        .fetch_optional(pool)
        .await?;

        record.map(WorkloadComponent::try_from).transpose().map_err(Into::into)
    }

    async fn apply_status_if_newer(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        status: ComponentStatus,
        status_reason: Option<&str>,
        event_updated_at: DateTime<Utc>,
    ) -> anyhow::Result<bool> {
        let result = sqlx::query(
            "UPDATE workload_components
                SET status = $1, status_reason = $2, updated_at = $3
             WHERE id = $4 AND updated_at < $3",
        )
        .bind(serde_json::to_value(status)?)
        .bind(status_reason)
        .bind(event_updated_at)
        .bind(id)
        .execute(&mut **tx)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
