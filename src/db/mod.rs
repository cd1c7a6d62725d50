//! Database access layer for sweather
//!
//! A single key-value `store` table holds the wardrobe as one JSON array
//! value; every mutation rewrites the whole array.

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

pub mod wardrobe;

/// Open (creating if missing) the database and ensure the store table exists
pub async fn init_pool(db_path: &Path) -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(4)
        .connect_with(
            SqliteConnectOptions::from_str(db_path.to_str().context("Invalid database path")?)
                .context("Failed to parse database path")?
                .busy_timeout(Duration::from_millis(5000))
                .create_if_missing(true),
        )
        .await
        .context("Failed to open database")?;

    create_store_table(&pool).await?;

    Ok(pool)
}

/// Create the key-value store table if missing
pub async fn create_store_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS store (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create store table")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config;

    #[tokio::test]
    async fn test_init_pool_creates_database_file() {
        let dir = tempfile::tempdir().expect("Should create scratch directory");
        let db_path = config::database_path(dir.path());
        assert!(!db_path.exists());

        let pool = init_pool(&db_path).await.expect("Should open database");
        assert!(db_path.exists());

        // Table is ready for writes straight away
        sqlx::query("INSERT INTO store (key, value) VALUES ('k', 'v')")
            .execute(&pool)
            .await
            .expect("Should write to store table");
        pool.close().await;
    }
}

#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    // max_connections(1): each in-memory SQLite connection is its own database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Should open in-memory database");
    create_store_table(&pool)
        .await
        .expect("Should create store table");
    pool
}
