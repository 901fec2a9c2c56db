//! # Storage Error Types
//!
//! Error types for collection storage.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)      JSON Error (serde_json::Error)        │
//! │       │                                 │                               │
//! │       └──────────────┬──────────────────┘                               │
//! │                      ▼                                                  │
//! │  DbError                                                                │
//! │       │                                                                 │
//! │       ├── load: logged, collection treated as empty                    │
//! │       └── save: logged, command reports `durable: false`               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// A row the caller asked for is not there.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// The database file could not be opened or created (bad path,
    /// permissions, full disk).
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The `collections` schema could not be brought up to date.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// SQLite rejected a statement, e.g. the file is locked or read-only.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A collection could not be encoded to JSON.
    #[error("Serialization failed for {collection}: {message}")]
    Serialization { collection: String, message: String },

    /// No connection became free in time.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a Serialization error for the named collection.
    pub fn serialization(collection: impl Into<String>, err: serde_json::Error) -> Self {
        DbError::Serialization {
            collection: collection.into(),
            message: err.to_string(),
        }
    }
}

/// ```text
/// RowNotFound   → NotFound      PoolTimedOut → PoolExhausted
/// Database(..)  → QueryFailed   PoolClosed   → ConnectionFailed
/// anything else → Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),

            sqlx::Error::Database(db_err) => DbError::QueryFailed(db_err.message().to_string()),

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;
