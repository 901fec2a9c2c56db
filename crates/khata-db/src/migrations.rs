//! # Database Migrations
//!
//! Embedded SQL migrations for Khata POS.
//!
//! There is one table, `collections(key, value, updated_at)`. Each value
//! is a whole JSON array; the shape of that JSON is not versioned here,
//! only the table around it.
//!
//! New migrations go in `migrations/sqlite/` as `NNN_description.sql`.
//! Applied files are never edited.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies pending migrations. Runs on every open; a no-op when current.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    MIGRATOR.run(pool).await?;
    debug!(migrations = MIGRATOR.migrations.len(), "Schema up to date");
    Ok(())
}

/// Returns (total_migrations, applied_migrations).
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let total = MIGRATOR.migrations.len();

    let applied: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
            .fetch_one(pool)
            .await?;

    Ok((total, applied as usize))
}
