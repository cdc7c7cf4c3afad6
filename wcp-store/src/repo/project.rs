use async_trait::async_trait;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Project {
    pub id: Uuid,
    pub cluster_id: Uuid,
    pub name: String,
}

#[async_trait]
pub trait ProjectRepo: Send + Sync {
    async fn get(&self, pool: &sqlx::PgPool, id: Uuid) -> anyhow::Result<Option<Project>>;
}

pub struct DbProjectRepo;

#[async_trait]
impl ProjectRepo for DbProjectRepo {
    async fn get(&self, pool: &sqlx::PgPool, id: Uuid) -> anyhow::Result<Option<Project>> {
        let project = sqlx::query_as::<_, Project>("SELECT id, cluster_id, name FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(project)
    }
}
