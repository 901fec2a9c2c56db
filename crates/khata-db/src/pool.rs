//! # Database Pool Management
//!
//! Opening the SQLite file that holds the collections.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      One khata Invocation                               │
//! │                                                                         │
//! │  DbConfig::new(path)                                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await   open/create file, WAL, migrations       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  db.books().load_all()  →  one command  →  db.books().save_all()       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  db.close().await                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrent Invocations
//! Two `khata` processes may open the same file. WAL lets a report read
//! while another process saves; writers wait up to `busy_timeout` for the
//! lock, and the last save wins.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::collection::CollectionRepository;
use crate::store::BookStore;

const MEMORY_PATH: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/path/to/khata.db")
///     .busy_timeout(Duration::from_secs(10));
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file, created when missing.
    pub database_path: PathBuf,

    /// Maximum number of pooled connections.
    /// Default: 2 (a command's writes plus a spare read)
    pub max_connections: u32,

    /// How long a write waits for another process's lock.
    /// Default: 5 seconds
    pub busy_timeout: Duration,

    /// Whether to run migrations on connect.
    /// Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 2,
            busy_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }

    /// An isolated database that disappears on close. Used by tests.
    pub fn in_memory() -> Self {
        DbConfig {
            // Every pooled connection would get its own empty database.
            max_connections: 1,
            ..DbConfig::new(MEMORY_PATH)
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path == Path::new(MEMORY_PATH)
    }

    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        if self.is_in_memory() {
            return SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()));
        }

        Ok(SqliteConnectOptions::new()
            .filename(&self.database_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            // NORMAL is safe under WAL; a crash may lose the last save only
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(self.busy_timeout))
    }
}

// =============================================================================
// Database
// =============================================================================

/// Open database handle.
///
/// ## Usage in Commands
/// ```rust,ignore
/// pub async fn list_creditors(db: &DbState) -> Result<Vec<CreditorDto>, ApiError> {
///     let books = db.inner().books().load_all().await;
///     Ok(books.creditors.iter().map(CreditorDto::from).collect())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
    path: PathBuf,
}

impl Database {
    /// Opens (creating if needed) the database and applies migrations.
    ///
    /// ## Errors
    /// - `ConnectionFailed` if the file cannot be opened or created
    /// - `MigrationFailed` if the schema cannot be brought up to date
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(path = %config.database_path.display(), "Opening database");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(config.connect_options()?)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        debug!(max_connections = config.max_connections, "Database pool created");

        let db = Database {
            pool,
            path: config.database_path,
        };

        if config.run_migrations {
            migrations::run_migrations(&db.pool).await?;
        }

        Ok(db)
    }

    /// The database file, or `:memory:`.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the raw collection repository.
    pub fn collections(&self) -> CollectionRepository {
        CollectionRepository::new(self.pool.clone())
    }

    /// Returns the typed book store.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let mut books = db.books().load_all().await;
    /// create_sale(&mut books, &form, Utc::now())?;
    /// db.books().save_all(&books).await?;
    /// ```
    pub fn books(&self) -> BookStore {
        BookStore::new(self.collections())
    }

    /// Closes the pool so WAL contents are checkpointed.
    pub async fn close(&self) {
        debug!("Closing database connection pool");
        self.pool.close().await;
    }

    /// True when a trivial query succeeds.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}
