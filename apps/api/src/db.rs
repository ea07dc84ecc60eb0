use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Creates the roster table if this database has never seen it.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS roster_entries (
            id            TEXT PRIMARY KEY,
            candidate     JSONB NOT NULL,
            questions     JSONB NOT NULL,
            answers       JSONB NOT NULL,
            score         SMALLINT NOT NULL CHECK (score BETWEEN 0 AND 100),
            summary       TEXT NOT NULL,
            triage_status TEXT NOT NULL DEFAULT 'normal',
            created_at    TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}
