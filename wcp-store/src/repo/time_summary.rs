use async_trait::async_trait;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;
use wcp_defs::model::WorkloadStatus;

use crate::records::workload_status_to_str;

/// `(workload_id, status)` is unique (spec §3); accumulation relies on
/// the database's own uniqueness constraint rather than an explicit
/// lock, per spec §5's "optimistic, no explicit row locks" policy — an
/// upsert either creates the row or adds to the existing one in a single
/// statement.
#[async_trait]
pub trait TimeSummaryRepo: Send + Sync {
    async fn accumulate(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        workload_id: Uuid,
        status: WorkloadStatus,
        elapsed_seconds: i64,
    ) -> anyhow::Result<()>;
}

pub struct DbTimeSummaryRepo;

#[async_trait]
impl TimeSummaryRepo for DbTimeSummaryRepo {
    async fn accumulate(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        workload_id: Uuid,
        status: WorkloadStatus,
        elapsed_seconds: i64,
    ) -> anyhow::Result<()> {
        if elapsed_seconds <= 0 {
            return Ok(());
        }

        sqlx::query(
            "INSERT INTO workload_time_summaries (id, workload_id, status, total_elapsed_seconds)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (workload_id, status)
             DO UPDATE SET total_elapsed_seconds = workload_time_summaries.total_elapsed_seconds + EXCLUDED.total_elapsed_seconds",
        )
        .bind(Uuid::new_v4())
        .bind(workload_id)
        .bind(workload_status_to_str(status))
        .bind(elapsed_seconds)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}
