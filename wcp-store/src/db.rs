use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

/// Builds the connection pool and runs embedded migrations, mirroring
/// `golemcloud-golem`'s `db::postgres_pool` + `sqlx::migrate!` startup
/// sequence. Called once per process, before the HTTP/queue listeners
/// start accepting work.
pub async fn connect_postgres(database_url: &str) -> anyhow::Result<Pool<Postgres>> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}
