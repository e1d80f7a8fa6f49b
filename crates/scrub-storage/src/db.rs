//! Database operations

use std::path::Path;
use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::Result;
use crate::schema;

/// SQLite-backed relational store.
pub struct Storage {
    pool: SqlitePool,
}

impl Storage {
    /// Open (or create) the database file at `db_path`.
    pub async fn new(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true);
        Self::connect(options).await
    }

    /// Private in-memory database.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        Self::connect(options).await
    }

    async fn connect(options: SqliteConnectOptions) -> Result<Self> {
        // One connection: inserts are strictly sequential, and an in-memory
        // database only exists on the connection that created it.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Empty the forum table, creating it first if it does not exist.
    pub async fn prepare_forum_table(&self, table: &str) -> Result<()> {
        let quoted = schema::quote_table(table)?;

        if self.table_exists(table).await? {
            sqlx::query(&format!("DELETE FROM {}", quoted))
                .execute(&self.pool)
                .await?;
            tracing::debug!("Emptied existing table {}", table);
        } else {
            sqlx::query(&schema::create_forum_table_sql(&quoted))
                .execute(&self.pool)
                .await?;
            tracing::debug!("Created table {}", table);
        }
        Ok(())
    }

    pub async fn table_exists(&self, table: &str) -> Result<bool> {
        let name = table.rsplit('.').next().unwrap_or(table);
        let found: Option<(String,)> =
            sqlx::query_as("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;
        Ok(found.is_some())
    }

    pub async fn count_rows(&self, table: &str) -> Result<i64> {
        let quoted = schema::quote_table(table)?;
        let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", quoted))
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
