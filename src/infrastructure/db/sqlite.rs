use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

use crate::settings::DatabaseSettings;

pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

pub async fn create_pool(settings: &DatabaseSettings) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&settings.url)?
        .create_if_missing(true);

    // Every connection to `:memory:` is its own database, so keep exactly one alive.
    let pool_options = if settings.is_in_memory() {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(settings.max_connections.max(1))
    };

    let pool = pool_options.connect_with(options).await?;
    info!("Database connection established.");
    Ok(pool)
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await?;
    info!("Database migrations applied.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_memory() -> DatabaseSettings {
        DatabaseSettings { url: "sqlite::memory:".into(), max_connections: 5 }
    }

    #[tokio::test]
    async fn in_memory_schema_survives_between_queries() {
        let pool = create_pool(&in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();

        sqlx::query("INSERT INTO skills (name, proficiency) VALUES ('Rust', 70)")
            .execute(&pool)
            .await
            .unwrap();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM skills")
            .fetch_one(&pool)
            .await
            .unwrap();

        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let pool = create_pool(&in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        run_migrations(&pool).await.unwrap();
    }
}
