//! # Collection Repository
//!
//! Raw key-value access to the `collections` table. Values are opaque text
//! here; typing happens in [`crate::store::BookStore`].

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

/// Repository for stored collection values.
#[derive(Debug, Clone)]
pub struct CollectionRepository {
    pool: SqlitePool,
}

impl CollectionRepository {
    /// Creates a new CollectionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CollectionRepository { pool }
    }

    /// Reads the value stored under `key`.
    ///
    /// ## Returns
    /// `None` when nothing has been written under the key.
    pub async fn get(&self, key: &str) -> DbResult<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM collections WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        Ok(value)
    }

    /// Writes `value` under `key`, replacing any previous value.
    pub async fn put(&self, key: &str, value: &str) -> DbResult<()> {
        debug!(key = %key, bytes = value.len(), "Writing collection");

        sqlx::query(
            r#"
            INSERT INTO collections (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Writes several values in one transaction.
    ///
    /// Either every value is written or none is.
    pub async fn put_many(&self, entries: &[(&str, String)]) -> DbResult<()> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        for (key, value) in entries {
            debug!(key = %key, bytes = value.len(), "Writing collection");

            sqlx::query(
                r#"
                INSERT INTO collections (key, value, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at
                "#,
            )
            .bind(*key)
            .bind(value.as_str())
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Removes the values stored under `keys` in one transaction.
    ///
    /// ## Returns
    /// Number of keys that existed.
    pub async fn remove_many(&self, keys: &[&str]) -> DbResult<u64> {
        let mut tx = self.pool.begin().await?;
        let mut removed = 0;

        for key in keys {
            let result = sqlx::query("DELETE FROM collections WHERE key = ?1")
                .bind(*key)
                .execute(&mut *tx)
                .await?;
            removed += result.rows_affected();
        }

        tx.commit().await?;
        debug!(removed, "Removed collections");
        Ok(removed)
    }

    /// Keys that currently hold a value, sorted.
    pub async fn keys(&self) -> DbResult<Vec<String>> {
        let keys: Vec<String> = sqlx::query_scalar("SELECT key FROM collections ORDER BY key")
            .fetch_all(&self.pool)
            .await?;

        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn repo() -> CollectionRepository {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.collections()
    }

    #[tokio::test]
    async fn test_put_get_overwrite() {
        let repo = repo().await;

        assert_eq!(repo.get("sales").await.unwrap(), None);

        repo.put("sales", "[1]").await.unwrap();
        repo.put("sales", "[1,2]").await.unwrap();

        assert_eq!(repo.get("sales").await.unwrap().as_deref(), Some("[1,2]"));
        assert_eq!(repo.keys().await.unwrap(), vec!["sales".to_string()]);
    }

    #[tokio::test]
    async fn test_put_many_and_remove_many() {
        let repo = repo().await;

        repo.put_many(&[
            ("sales", "[]".to_string()),
            ("expenses", "[]".to_string()),
            ("creditors", "[]".to_string()),
        ])
        .await
        .unwrap();

        let removed = repo.remove_many(&["sales", "expenses", "payments"]).await.unwrap();
        assert_eq!(removed, 2);
        assert_eq!(repo.keys().await.unwrap(), vec!["creditors".to_string()]);
    }
}
